use std::str::FromStr;

use js_sys::Function;
use log::LevelFilter;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod console;
pub mod deck;
pub mod error;
pub mod game;
pub mod hand;
pub mod policy;
pub mod random;
pub mod rigger;
pub mod session;

pub use config::TableConfig;
pub use deck::{Card, CardRequest, Rank, Shoe, Suit};
pub use error::{ConfigError, GameError};
pub use game::{Outcome, Resolution, RiggedGame};
pub use hand::{evaluate_total, has_soft_ace, Hand, BLACKJACK};
pub use policy::{Target, DEALER_FLOOR};
pub use random::{RandomSource, ScriptedSource};
pub use rigger::{rig_dealer_hand, Fallback, RiggedHand};
pub use session::{Phase, RoundState, Session, Snapshot};

#[wasm_bindgen]
pub fn init_logging(level: Option<String>) -> Result<(), JsValue> {
    let filter = match level {
        Some(level) => LevelFilter::from_str(&level)
            .map_err(|err| JsValue::from_str(&format!("Invalid log level: {err}")))?,
        None => LevelFilter::Info,
    };
    console::init(filter);
    Ok(())
}

/// Dealer's target for a player total, or `undefined` when the player has busted.
#[wasm_bindgen]
pub fn dealer_target(player_total: u8) -> Option<u8> {
    Target::for_player_total(player_total).map(Target::value)
}

/// One player's seat at the table, driven by the page's buttons.
#[wasm_bindgen]
pub struct Table {
    session: Session<SmallRng>,
    listener: Option<Function>,
}

#[wasm_bindgen]
impl Table {
    #[wasm_bindgen(constructor)]
    pub fn new(config: &JsValue, seed: Option<u32>) -> Result<Table, JsValue> {
        console_error_panic_hook::set_once();
        let config: TableConfig = if config.is_undefined() || config.is_null() {
            TableConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config.clone())
                .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?
        };

        let session = match seed {
            Some(seed) => Session::seeded(config, u64::from(seed)),
            None => Session::from_entropy(config),
        }
        .map_err(|err| JsValue::from_str(&format!("Invalid config: {err}")))?;

        Ok(Table {
            session,
            listener: None,
        })
    }

    pub fn deal(&mut self, bet: u32) -> Result<JsValue, JsValue> {
        let result = self.session.start_round(bet);
        self.publish(result)
    }

    #[wasm_bindgen(js_name = dealMax)]
    pub fn deal_max(&mut self) -> Result<JsValue, JsValue> {
        let bet = self.session.max_bet();
        let result = self.session.start_round(bet);
        self.publish(result)
    }

    pub fn hit(&mut self) -> Result<JsValue, JsValue> {
        let result = self.session.player_hit();
        self.publish(result)
    }

    pub fn stand(&mut self) -> Result<JsValue, JsValue> {
        let result = self.session.player_stand();
        self.publish(result)
    }

    pub fn restart(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.session.next_round();
        self.publish(Ok(snapshot))
    }

    pub fn reset(&mut self) -> Result<JsValue, JsValue> {
        let snapshot = self.session.reset_session();
        self.publish(Ok(snapshot))
    }

    #[wasm_bindgen(js_name = maxBet)]
    pub fn max_bet(&self) -> u32 {
        self.session.max_bet()
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Registers a callback invoked with the fresh snapshot after every state change,
    /// rejected input included.
    pub fn subscribe(&mut self, callback: Function) {
        self.listener = Some(callback);
    }
}

impl Table {
    fn publish(&self, result: Result<Snapshot, GameError>) -> Result<JsValue, JsValue> {
        if let Some(listener) = &self.listener {
            let snapshot = to_js(&self.session.snapshot())?;
            listener.call1(&JsValue::NULL, &snapshot)?;
        }

        let snapshot = result.map_err(|err| JsValue::from_str(&err.to_string()))?;
        to_js(&snapshot)
    }
}

fn to_js(snapshot: &Snapshot) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(snapshot)
        .map_err(|err| JsValue::from_str(&format!("Serialization failed: {err}")))
}

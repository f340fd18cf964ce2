//! Interview handlers.

mod conduct_turn;

pub use conduct_turn::{
    ConductTurnCommand, ConductTurnError, ConductTurnHandler, ConductTurnResult,
};

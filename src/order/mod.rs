//! Venue order requests

mod assembler;
mod request;

pub use assembler::OrderAssembler;
pub use request::{
    FillPolicy, OrderRequest, OrderResult, OrderTypeCode, TimeInForce, TradeAction, RETCODE_DONE,
};

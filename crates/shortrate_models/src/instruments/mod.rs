//! Instruments and their closed-form pricing under the Hull-White model.

pub mod rates;

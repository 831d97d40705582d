//! Small allocation-light helpers with no dependents outside the crate
//! graph. Currently just incremental UTF-8 decoding, used by `html`'s byte
//! -> string step and `browser`'s stylesheet body decode.

pub mod utf8;

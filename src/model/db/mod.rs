//! Database document types.
//!
//! IDs and datetimes are stored in MongoDB's own formats; each document type
//! comes as a `*Core` with the data, a `New*` alias for inserting it without an
//! ID, and a wrapper carrying the `_id` once it has been read back.

mod account;
pub use account::{Account, AccountCore, NewAccount};

mod pair;
pub use pair::{NewPair, Pair, PairCore};

//! Handler-side extension traits, imported with `use crate::extensions::*`.

mod depot;

pub(crate) use depot::DepotExt as _;

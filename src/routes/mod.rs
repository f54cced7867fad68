pub(crate) mod health;
pub(crate) mod asset_types;
pub(crate) mod assets;
pub(crate) mod portfolios;
pub(crate) mod holdings;
pub(crate) mod transactions;

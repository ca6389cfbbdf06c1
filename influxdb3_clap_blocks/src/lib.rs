//! Building blocks for [`clap`]-driven configuration of the DBRP mapping service.

pub mod dbrp;

//! clientbook - integration test support.
//!
//! This crate re-exports the workspace crates so integration tests can use
//! `clientbook_test::` paths.

pub mod component {
    pub use clientbook_core::{constants, types};
    pub use clientbook_service::{client, client_code, contact, error, link, validation};

    pub mod store {
        pub use clientbook_app::store_handler::StoreHandler;
        pub use clientbook_db::store::*;
    }

    pub mod model {
        pub use clientbook_db::model::*;
    }

    // Re-export config from both core and app
    pub mod config {
        pub use clientbook_app::config::ConfigHandler;
        pub use clientbook_core::config::*;
    }
}

pub mod app {
    pub mod api {
        pub use clientbook_app::app::api::*;
    }
}

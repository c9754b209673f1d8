//! Configuration section definitions.
//!
//! Each module corresponds to a section in `syndic.toml`:
//!
//! | Module     | TOML Section   | Purpose                                  |
//! |------------|----------------|------------------------------------------|
//! | `site`     | `[site]`       | Public base URL, language, generator     |
//! | `storage`  | `[storage]`    | Channel store file                       |
//! | `registry` | `[registry]`   | Content registry file and role markers   |
//! | `feed`     | `[feed]`       | Feed URLs, item links, limits            |
//! | `serve`    | `[serve]`      | Public feed endpoint                     |

mod feed;
mod registry;
mod serve;
mod site;
mod storage;

pub use feed::FeedConfig;
pub use registry::RegistryConfig;
pub use serve::ServeConfig;
pub use site::SiteConfig;
pub use storage::StorageConfig;

pub mod address;
pub mod distance;
pub mod name;
pub mod normalize;
pub mod phone;
pub mod scorer;
pub mod zip;

pub use address::{normalize_address, AddressDictionary};
pub use distance::token_distance;
pub use name::normalize_site_name;
pub use normalize::{normalize_all, normalize_record};
pub use phone::{normalize_phone, parse_phone, phone_distance};
pub use scorer::{FieldDistances, FieldWeights, RecordScorer};
pub use zip::normalize_zip;

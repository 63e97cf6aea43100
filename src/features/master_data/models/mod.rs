mod master_data;

pub use master_data::{MasterDataItem, MasterDataKind};

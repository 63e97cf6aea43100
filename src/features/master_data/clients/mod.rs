mod master_data_client;

pub use master_data_client::{MasterDataApi, MasterDataClient};

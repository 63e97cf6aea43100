mod master_data_handler;

pub use master_data_handler::{run, MasterDataCommand};

mod master_data_service;

pub use master_data_service::MasterDataService;

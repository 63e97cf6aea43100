mod master_data_dto;

pub use master_data_dto::{CreateMasterDataDto, UpdateMasterDataDto};

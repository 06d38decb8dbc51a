pub mod add;
pub mod delete;
pub mod edit;
pub mod export;
pub mod labels;
pub mod list;
pub mod remind;

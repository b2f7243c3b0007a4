pub mod flavor;
pub mod intent;
pub mod inventory;

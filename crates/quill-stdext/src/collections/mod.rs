pub mod floorstack;

pub mod aws;
pub mod employee_table;
pub mod face_index;
pub mod object_store;

mod common;

mod image;

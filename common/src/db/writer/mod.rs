pub mod bookshelf;

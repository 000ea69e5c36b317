pub mod adverts;

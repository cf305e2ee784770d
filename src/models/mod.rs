pub mod casas;
pub mod imagenes_base;
pub mod imagenes_casa;

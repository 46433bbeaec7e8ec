pub mod arithmetic;
pub mod geometric;
pub mod harmonic;

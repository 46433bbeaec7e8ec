use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum MeanType {
    #[strum(serialize = "arithmetic")]
    Arithmetic,
    #[strum(serialize = "geometric")]
    Geometric,
    #[strum(serialize = "harmonic")]
    Harmonic,
}

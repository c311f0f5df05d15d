//! Structure Model fixtures for generator conformance.
//!
//! Each constant holds the JSON form of a Structure Model covering one family
//! of constructs. [`ALL`] pairs them with the artifacts they must refuse.

mod catalog;
mod dematerialized;
mod polymorphic;
mod recursive;

pub use catalog::CATALOG;
pub use dematerialized::DEMATERIALIZED;
pub use polymorphic::POLYMORPHIC;
pub use recursive::RECURSIVE;

use structura_model::GeneratorKind;

/// A named fixture.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// Short name used in report lines.
    pub name: &'static str,
    /// Structure Model JSON.
    pub json: &'static str,
    /// Artifacts whose generator must refuse the model.
    pub refused: &'static [GeneratorKind],
}

/// Every fixture, in report order.
pub const ALL: [Fixture; 4] = [
    Fixture {
        name: "catalog",
        json: CATALOG,
        refused: &[],
    },
    Fixture {
        name: "polymorphic",
        json: POLYMORPHIC,
        refused: &[],
    },
    Fixture {
        name: "dematerialized",
        json: DEMATERIALIZED,
        refused: &[],
    },
    Fixture {
        name: "recursive",
        json: RECURSIVE,
        refused: &[GeneratorKind::Sparql],
    },
];

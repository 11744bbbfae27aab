use serde::{Deserialize, Serialize};

/// Symbol printed on a tile face. Decks draw a prefix of [`PALETTE`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Hearts,
    WaterDrop,
    Dice,
    Umbrella,
    Cube,
    BeachBall,
    Dragonfly,
    Hummingbird,
    FlowerEmblem,
    OpenBook,
    WineGlass,
    TShirt,
    MedicalPack,
}

pub const PALETTE: [Symbol; 13] = [
    Symbol::Hearts,
    Symbol::WaterDrop,
    Symbol::Dice,
    Symbol::Umbrella,
    Symbol::Cube,
    Symbol::BeachBall,
    Symbol::Dragonfly,
    Symbol::Hummingbird,
    Symbol::FlowerEmblem,
    Symbol::OpenBook,
    Symbol::WineGlass,
    Symbol::TShirt,
    Symbol::MedicalPack,
];

impl Symbol {
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Hearts => "Hearts",
            Symbol::WaterDrop => "Water drop",
            Symbol::Dice => "Dice",
            Symbol::Umbrella => "Umbrella",
            Symbol::Cube => "Cube",
            Symbol::BeachBall => "Beach ball",
            Symbol::Dragonfly => "Dragonfly",
            Symbol::Hummingbird => "Hummingbird",
            Symbol::FlowerEmblem => "Flower",
            Symbol::OpenBook => "Book",
            Symbol::WineGlass => "Wine glass",
            Symbol::TShirt => "T-shirt",
            Symbol::MedicalPack => "Medical pack",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Hearts => "♥",
            Symbol::WaterDrop => "💧",
            Symbol::Dice => "🎲",
            Symbol::Umbrella => "☂",
            Symbol::Cube => "🧊",
            Symbol::BeachBall => "🏐",
            Symbol::Dragonfly => "🪰",
            Symbol::Hummingbird => "🐦",
            Symbol::FlowerEmblem => "🌸",
            Symbol::OpenBook => "📖",
            Symbol::WineGlass => "🍷",
            Symbol::TShirt => "👕",
            Symbol::MedicalPack => "🩹",
        }
    }
}

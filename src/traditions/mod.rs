pub mod routes;

use serde::Serialize;

/// One New Year tradition; `icon` is an ISO 3166 flag code for the UI.
#[derive(Debug, Clone, Serialize)]
pub struct Tradition {
    pub country: &'static str,
    pub icon: &'static str,
    pub text: &'static str,
}

pub const TRADITIONS: [Tradition; 10] = [
    Tradition {
        country: "Spain",
        icon: "es",
        text: "Eat twelve grapes at midnight, one for luck on each stroke of the clock.",
    },
    Tradition {
        country: "Denmark",
        icon: "dk",
        text: "Smash old plates against friends' doors; a big pile of shards means many well-wishers.",
    },
    Tradition {
        country: "Japan",
        icon: "jp",
        text: "Temple bells ring 108 times at midnight to clear away the old year's worldly desires.",
    },
    Tradition {
        country: "Brazil",
        icon: "br",
        text: "Wear white for peace and jump seven waves, making a wish on each one.",
    },
    Tradition {
        country: "Scotland",
        icon: "gb-sct",
        text: "First-footing: the first visitor after midnight brings coal, shortbread, and whisky for luck.",
    },
    Tradition {
        country: "Philippines",
        icon: "ph",
        text: "Surround yourself with round things — fruit, coins, polka dots — to draw in prosperity.",
    },
    Tradition {
        country: "Greece",
        icon: "gr",
        text: "Cut the vasilopita cake at midnight; whoever finds the hidden coin gets the year's luck.",
    },
    Tradition {
        country: "Colombia",
        icon: "co",
        text: "Carry an empty suitcase around the block for a year full of travel.",
    },
    Tradition {
        country: "Estonia",
        icon: "ee",
        text: "Eat seven, nine, or twelve meals on New Year's Eve for the strength of that many men.",
    },
    Tradition {
        country: "Italy",
        icon: "it",
        text: "A plate of lentils after midnight brings wealth, one coin per lentil.",
    },
];

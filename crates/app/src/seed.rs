use services::SeedCategory;

/// Sample categories preloaded on first run; seeding skips any category
/// whose file already exists.
pub const DEFAULT_CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Linux",
        questions: &[
            ("What command is used to list files in Linux?", "ls"),
            ("What is the default shell in most Linux distributions?", "bash"),
        ],
    },
    SeedCategory {
        name: "Python",
        questions: &[
            ("What keyword is used to define a function in Python?", "def"),
            ("What is Python's standard package manager?", "pip"),
        ],
    },
    SeedCategory {
        name: "Chess",
        questions: &[
            ("How many squares are on a chessboard?", "64"),
            (
                "What is the term for a move that puts the king in check and cannot be stopped?",
                "Checkmate",
            ),
        ],
    },
    SeedCategory {
        name: "Geography",
        questions: &[
            ("What is the capital of France?", "Paris"),
            ("Which continent is the Sahara Desert located on?", "Africa"),
        ],
    },
    SeedCategory {
        name: "Electronics",
        questions: &[
            ("What does LED stand for?", "Light Emitting Diode"),
            ("What is the unit of electrical resistance?", "Ohm"),
        ],
    },
];

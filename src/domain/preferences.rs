use clap::{Args, ValueEnum};
use std::fmt;

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice!(
    /// What is your usual outfit vibe?
    StyleVibe {
        TrendyModern => "Trendy & Modern",
        CasualComfortable => "Casual & Comfortable",
        ClassicElegant => "Classic & Elegant",
        EdgyBold => "Edgy & Bold",
    }
);

choice!(
    /// What's the occasion for this outfit?
    Occasion {
        EverydayWear => "Everyday Wear",
        WorkBusiness => "Work/Business",
        PartyNightOut => "Party/Night Out",
        DateNight => "Date Night",
    }
);

choice!(
    /// What is your go-to color palette?
    ColorPalette {
        Neutral => "Neutral (Black, White, Beige, Gray)",
        SoftPastel => "Soft & Pastel (Pink, Lavender, Light Blue)",
        BrightPlayful => "Bright & Playful (Red, Yellow, Green)",
        DarkMysterious => "Dark & Mysterious (Navy, Burgundy, Deep Green)",
    }
);

choice!(
    /// What type of fit do you prefer?
    Fit {
        SlimFit => "Slim Fit",
        RegularFit => "Regular Fit",
        Oversized => "Oversized",
        Tailored => "Tailored",
    }
);

choice!(
    /// What fabric do you feel most comfortable in?
    Fabric {
        Cotton => "Cotton",
        Denim => "Denim",
        Silk => "Silk",
        Leather => "Leather",
        Linen => "Linen",
    }
);

choice!(
    /// Do you like to accessorize with?
    Accessories {
        MinimalJewelry => "Minimal Jewelry",
        BoldStatementPieces => "Bold Statement Pieces",
        ScarvesHats => "Scarves & Hats",
        NoAccessories => "No Accessories",
    }
);

/// The six answers collected at the start of a session.
#[derive(Args, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferenceSet {
    /// What is your usual outfit vibe?
    #[arg(long, value_enum, default_value_t)]
    pub style_vibe: StyleVibe,
    /// What's the occasion for this outfit?
    #[arg(long, value_enum, default_value_t)]
    pub occasion: Occasion,
    /// What is your go-to color palette?
    #[arg(long, value_enum, default_value_t)]
    pub color_palette: ColorPalette,
    /// What type of fit do you prefer?
    #[arg(long, value_enum, default_value_t)]
    pub fit: Fit,
    /// What fabric do you feel most comfortable in?
    #[arg(long, value_enum, default_value_t)]
    pub fabric: Fabric,
    /// Do you like to accessorize with?
    #[arg(long, value_enum, default_value_t)]
    pub accessories: Accessories,
}

impl PreferenceSet {
    /// Builds the stylist instruction sent along with the retrieved images.
    pub fn prompt(&self) -> String {
        format!(
            "You are a fashion stylist. The user is looking for outfit ideas. Their preferences are: \n\
             - **Style Vibe:** {}\n\
             - **Occasion:** {}\n\
             - **Color Palette:** {}\n\
             - **Preferred Fit:** {}\n\
             - **Fabric Preference:** {}\n\
             - **Accessory Preference:** {}\n\
             Analyze the retrieved images and suggest a complete outfit, including the top, bottom, footwear and accessories. \
             Explain why the outfit suits their style and occasion.",
            self.style_vibe,
            self.occasion,
            self.color_palette,
            self.fit,
            self.fabric,
            self.accessories,
        )
    }
}

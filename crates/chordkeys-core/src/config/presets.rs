// Chordkeys Built-in Layers
// Layer set used when no configuration file provides one

use crate::layer::Layer;
use crate::LogicalKey::{self, *};

fn layer(name: &str, secondaries: &[LogicalKey], mappings: &[(LogicalKey, LogicalKey)]) -> Layer {
    let mut layer = Layer::new(name);
    for &key in secondaries {
        layer.add_secondary(key);
    }
    for &(input, output) in mappings {
        layer.add_mapping(input, output);
    }
    layer
}

/// Editing keys and modifiers under the home row
pub fn homesick() -> Layer {
    layer(
        "homesick",
        &[F, J],
        &[
            (Q, Tab),
            (W, Grave),
            (A, Escape),
            (Z, LeftShift),
            (X, LeftCtrl),
            (C, LeftMeta),
            (V, LeftAlt),
            (U, Backspace),
            (I, LeftBracket),
            (O, RightBracket),
            (P, Backslash),
            (L, Apostrophe),
            (Semicolon, Enter),
            (Comma, RightAlt),
            (Period, RightCtrl),
            (Slash, RightShift),
        ],
    )
}

/// Digits on the home row, their shifted symbols on the top row
pub fn number_pulldown() -> Layer {
    layer(
        "number_pulldown",
        &[D, K],
        &[
            (A, Num1),
            (S, Num2),
            (D, Num3),
            (F, Num4),
            (G, Num5),
            (H, Num6),
            (J, Num7),
            (K, Num8),
            (L, Num9),
            (Semicolon, Num0),
            (Q, Exclamation),
            (W, At),
            (E, Hash),
            (R, Dollar),
            (T, Percent),
            (Y, Caret),
            (U, Ampersand),
            (I, Asterisk),
            (O, LeftParen),
            (P, RightParen),
        ],
    )
}

/// Brackets and operators
pub fn programming() -> Layer {
    layer(
        "programming",
        &[S, L],
        &[
            (F, LeftParen),
            (J, RightParen),
            (D, LeftBracket),
            (K, RightBracket),
            (S, LessThan),
            (L, GreaterThan),
            (A, LeftBrace),
            (Semicolon, RightBrace),
            (Q, Ampersand),
            (W, Underscore),
            (E, Equal),
            (U, Plus),
            (I, Minus),
            (O, Asterisk),
            (P, Slash),
            (X, Colon),
        ],
    )
}

pub fn vim_arrows() -> Layer {
    layer("vim_arrows", &[V], &[(H, Left), (L, Right), (J, Down), (K, Up)])
}

pub fn shift_lock() -> Layer {
    let mut layer = Layer::shift_lock("shift_lock");
    layer.add_secondary(Z);
    layer.add_secondary(Slash);
    layer
}

/// All built-in layers in declaration order
pub fn builtin_layers() -> Vec<Layer> {
    vec![
        homesick(),
        number_pulldown(),
        programming(),
        vim_arrows(),
        shift_lock(),
    ]
}

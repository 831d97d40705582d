//! The closed `PropertyId` enum (§3 "PropertyId") plus its CSS 2.2
//! inheritance table and initial values.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PropertyId {
    Color,
    BackgroundColor,
    BackgroundImage,
    BackgroundRepeat,
    BackgroundPosition,
    BackgroundAttachment,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderTopStyle,
    BorderRightStyle,
    BorderBottomStyle,
    BorderLeftStyle,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderTopLeftRadius,
    BorderTopRightRadius,
    BorderBottomRightRadius,
    BorderBottomLeftRadius,
    OutlineColor,
    OutlineStyle,
    OutlineWidth,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Width,
    Height,
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
    Display,
    Float,
    Position,
    Top,
    Right,
    Bottom,
    Left,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    FontVariant,
    FontStretch,
    LineHeight,
    LetterSpacing,
    TextAlign,
    TextDecorationLine,
    TextDecorationStyle,
    TextDecorationColor,
    TextTransform,
    WhiteSpace,
    ListStyleType,
    ListStylePosition,
    ListStyleImage,
    FlexDirection,
    FlexWrap,
    FlexGrow,
    FlexShrink,
    FlexBasis,
    Unknown,
}

use PropertyId::*;

const ALL: &[(&str, PropertyId)] = &[
    ("color", Color),
    ("background-color", BackgroundColor),
    ("background-image", BackgroundImage),
    ("background-repeat", BackgroundRepeat),
    ("background-position", BackgroundPosition),
    ("background-attachment", BackgroundAttachment),
    ("border-top-color", BorderTopColor),
    ("border-right-color", BorderRightColor),
    ("border-bottom-color", BorderBottomColor),
    ("border-left-color", BorderLeftColor),
    ("border-top-style", BorderTopStyle),
    ("border-right-style", BorderRightStyle),
    ("border-bottom-style", BorderBottomStyle),
    ("border-left-style", BorderLeftStyle),
    ("border-top-width", BorderTopWidth),
    ("border-right-width", BorderRightWidth),
    ("border-bottom-width", BorderBottomWidth),
    ("border-left-width", BorderLeftWidth),
    ("border-top-left-radius", BorderTopLeftRadius),
    ("border-top-right-radius", BorderTopRightRadius),
    ("border-bottom-right-radius", BorderBottomRightRadius),
    ("border-bottom-left-radius", BorderBottomLeftRadius),
    ("outline-color", OutlineColor),
    ("outline-style", OutlineStyle),
    ("outline-width", OutlineWidth),
    ("padding-top", PaddingTop),
    ("padding-right", PaddingRight),
    ("padding-bottom", PaddingBottom),
    ("padding-left", PaddingLeft),
    ("margin-top", MarginTop),
    ("margin-right", MarginRight),
    ("margin-bottom", MarginBottom),
    ("margin-left", MarginLeft),
    ("width", Width),
    ("height", Height),
    ("min-width", MinWidth),
    ("max-width", MaxWidth),
    ("min-height", MinHeight),
    ("max-height", MaxHeight),
    ("display", Display),
    ("float", Float),
    ("position", Position),
    ("top", Top),
    ("right", Right),
    ("bottom", Bottom),
    ("left", Left),
    ("font-family", FontFamily),
    ("font-size", FontSize),
    ("font-style", FontStyle),
    ("font-weight", FontWeight),
    ("font-variant", FontVariant),
    ("font-stretch", FontStretch),
    ("line-height", LineHeight),
    ("letter-spacing", LetterSpacing),
    ("text-align", TextAlign),
    ("text-decoration-line", TextDecorationLine),
    ("text-decoration-style", TextDecorationStyle),
    ("text-decoration-color", TextDecorationColor),
    ("text-transform", TextTransform),
    ("white-space", WhiteSpace),
    ("list-style-type", ListStyleType),
    ("list-style-position", ListStylePosition),
    ("list-style-image", ListStyleImage),
    ("flex-direction", FlexDirection),
    ("flex-wrap", FlexWrap),
    ("flex-grow", FlexGrow),
    ("flex-shrink", FlexShrink),
    ("flex-basis", FlexBasis),
];

impl PropertyId {
    pub fn from_name(name: &str) -> PropertyId {
        ALL.iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, id)| *id)
            .unwrap_or(Unknown)
    }

    pub fn name(&self) -> &'static str {
        ALL.iter()
            .find(|(_, id)| id == self)
            .map(|(n, _)| *n)
            .unwrap_or("unknown")
    }

    /// CSS 2.2 §6.2 inheritance table (the properties this engine knows
    /// about). Box-model and visual-effect properties are not inherited.
    pub fn is_inherited(&self) -> bool {
        matches!(
            self,
            Color
                | FontFamily
                | FontSize
                | FontStyle
                | FontWeight
                | FontVariant
                | FontStretch
                | LineHeight
                | LetterSpacing
                | TextAlign
                | TextTransform
                | WhiteSpace
                | ListStyleType
                | ListStylePosition
                | ListStyleImage
        )
    }

    pub fn initial_value(&self) -> &'static str {
        match self {
            Color => "canvastext",
            BackgroundColor => "transparent",
            BackgroundImage | ListStyleImage => "none",
            BackgroundRepeat => "repeat",
            BackgroundPosition => "0% 0%",
            BackgroundAttachment => "scroll",
            BorderTopColor | BorderRightColor | BorderBottomColor | BorderLeftColor => "currentcolor",
            BorderTopStyle | BorderRightStyle | BorderBottomStyle | BorderLeftStyle => "none",
            BorderTopWidth | BorderRightWidth | BorderBottomWidth | BorderLeftWidth => "medium",
            BorderTopLeftRadius | BorderTopRightRadius | BorderBottomRightRadius | BorderBottomLeftRadius => "0",
            OutlineColor => "currentcolor",
            OutlineStyle => "none",
            OutlineWidth => "medium",
            PaddingTop | PaddingRight | PaddingBottom | PaddingLeft => "0",
            MarginTop | MarginRight | MarginBottom | MarginLeft => "0",
            Width | Height | MinWidth | MinHeight | Top | Right | Bottom | Left => "auto",
            MaxWidth | MaxHeight => "none",
            Display => "inline",
            Float => "none",
            Position => "static",
            FontFamily => "monospace",
            FontSize => "medium",
            FontStyle => "normal",
            FontWeight => "normal",
            FontVariant => "normal",
            FontStretch => "normal",
            LineHeight => "normal",
            LetterSpacing => "normal",
            TextAlign => "left",
            TextDecorationLine => "none",
            TextDecorationStyle => "solid",
            TextDecorationColor => "currentcolor",
            TextTransform => "none",
            WhiteSpace => "normal",
            ListStyleType => "disc",
            ListStylePosition => "outside",
            FlexDirection => "row",
            FlexWrap => "nowrap",
            FlexGrow | FlexShrink => "0",
            FlexBasis => "auto",
            Unknown => "",
        }
    }
}

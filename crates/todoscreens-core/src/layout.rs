//! Display layout document
//!
//! A [`Layout`] is the drawing instruction set the display service accepts:
//! an ordered list of items plus background and refresh options. Items are
//! built with plain Rust types and converted to the service's JSON shape by
//! [`Layout::export`].

use serde::Serialize;

/// Number of physical buttons along the bottom edge of a display
pub const BUTTON_SLOTS: usize = 4;

/// Colors an e-paper panel can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    /// Unlit paper
    White,
    /// Full ink
    Black,
}

/// Fonts installed on the display firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Font {
    /// D-DIN, 24px
    #[serde(rename = "DDIN_24")]
    Ddin24,
    /// D-DIN, 32px
    #[serde(rename = "DDIN_32")]
    Ddin32,
    /// Roboto Condensed, 24px
    #[serde(rename = "ROBOTO_CONDENSED_24")]
    RobotoCondensed24,
    /// April Sans, 16px
    #[serde(rename = "APRILSANS_16")]
    AprilSans16,
    /// Font Awesome solid icon glyphs
    #[serde(rename = "ICON_FA_SOLID")]
    IconFaSolid,
}

/// Horizontal text alignment inside a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Align {
    /// Flush left
    Left,
    /// Flush right
    Right,
    /// Centered
    Center,
}

/// A text block
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// String to draw
    pub text: String,
    /// Top-left corner of the block, in pixels
    pub position: (i32, i32),
    /// Block width and height
    pub size: (u32, u32),
    /// Text offset inside the block
    pub offset: (i32, i32),
    /// Typeface
    pub font: Font,
    /// Foreground color
    pub color: Color,
    /// Block fill color
    pub background_color: Color,
    /// Horizontal alignment
    pub align: Align,
}

impl Text {
    /// Black `DDIN_32` text on white filling the whole panel from `position`
    pub fn new(text: impl Into<String>, position: (i32, i32)) -> Self {
        Self {
            text: text.into(),
            position,
            size: (400, 300),
            offset: (0, 0),
            font: Font::Ddin32,
            color: Color::Black,
            background_color: Color::White,
            align: Align::Left,
        }
    }

    /// Set the block size
    pub fn size(mut self, w: u32, h: u32) -> Self {
        self.size = (w, h);
        self
    }

    /// Shift the text inside its block
    pub fn offset(mut self, x: i32, y: i32) -> Self {
        self.offset = (x, y);
        self
    }

    /// Set the typeface
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Set the foreground color
    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the block fill color
    pub fn background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Set the alignment
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }
}

/// One entry of the bottom button bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Label drawn above the button
    pub title: String,
    /// Whether the label is drawn as active
    pub enabled: bool,
}

impl Button {
    /// Create a labelled button
    pub fn new(title: impl Into<String>, enabled: bool) -> Self {
        Self {
            title: title.into(),
            enabled,
        }
    }
}

/// Labels for the hardware buttons under the panel
///
/// Exports exactly [`BUTTON_SLOTS`] entries: extra buttons are dropped and
/// missing ones are filled with blank placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BottomButtons {
    /// Buttons from left to right
    pub buttons: Vec<Button>,
}

impl BottomButtons {
    /// Create a bar from left-to-right buttons
    pub fn new(buttons: Vec<Button>) -> Self {
        Self { buttons }
    }

    /// The slots as they will be sent to the display
    pub fn slots(&self) -> Vec<ButtonSlot<'_>> {
        let mut slots: Vec<ButtonSlot<'_>> = self
            .buttons
            .iter()
            .take(BUTTON_SLOTS)
            .map(|b| ButtonSlot {
                title: &b.title,
                style: if b.enabled {
                    ButtonStyle::Enabled
                } else {
                    ButtonStyle::Disabled
                },
            })
            .collect();
        while slots.len() < BUTTON_SLOTS {
            slots.push(ButtonSlot {
                title: "-",
                style: ButtonStyle::Blank,
            });
        }
        slots
    }
}

/// Exported button state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ButtonStyle {
    /// Active label
    Enabled,
    /// Greyed-out label
    Disabled,
    /// Placeholder with no action
    Blank,
}

/// A single exported button slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonSlot<'a> {
    /// Label text
    pub title: &'a str,
    /// Drawing style
    pub style: ButtonStyle,
}

/// An outlined and/or filled box
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Top-left corner, in pixels
    pub position: (i32, i32),
    /// Width and height
    pub size: (u32, u32),
    /// Fill color, none for a hollow box
    pub fill: Option<Color>,
    /// Outline color, none for no outline
    pub stroke: Option<Color>,
    /// Outline thickness in pixels
    pub stroke_width: u32,
}

impl Rectangle {
    /// Hollow, unstroked box
    pub fn new(position: (i32, i32), size: (u32, u32)) -> Self {
        Self {
            position,
            size,
            fill: None,
            stroke: None,
            stroke_width: 1,
        }
    }

    /// Fill with `color`
    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Outline with `color` at `width` pixels
    pub fn stroke(mut self, color: Color, width: u32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }
}

/// Drawable layout entries
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A text block
    Text(Text),
    /// The bottom button bar
    BottomButtons(BottomButtons),
    /// A box
    Rectangle(Rectangle),
}

impl From<Text> for Item {
    fn from(text: Text) -> Self {
        Item::Text(text)
    }
}

impl From<BottomButtons> for Item {
    fn from(buttons: BottomButtons) -> Self {
        Item::BottomButtons(buttons)
    }
}

impl From<Rectangle> for Item {
    fn from(rect: Rectangle) -> Self {
        Item::Rectangle(rect)
    }
}

/// A complete screen render
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    items: Vec<Item>,
    /// Panel background
    pub background: Color,
    /// Reserve the strip above the hardware buttons
    pub button_zone: bool,
    /// How often the node polls for a new render, in milliseconds
    pub poll_rate: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// Empty white layout
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            background: Color::White,
            button_zone: false,
            poll_rate: 10_000,
        }
    }

    /// Set the node poll rate in milliseconds
    pub fn with_poll_rate(mut self, poll_rate: u32) -> Self {
        self.poll_rate = poll_rate;
        self
    }

    /// Append an item; items draw in insertion order
    pub fn add(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    /// All items in drawing order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Text items in drawing order
    pub fn texts(&self) -> impl Iterator<Item = &Text> {
        self.items.iter().filter_map(|item| match item {
            Item::Text(text) => Some(text),
            _ => None,
        })
    }

    /// The bottom button bar, if one was added
    pub fn bottom_buttons(&self) -> Option<&BottomButtons> {
        self.items.iter().find_map(|item| match item {
            Item::BottomButtons(buttons) => Some(buttons),
            _ => None,
        })
    }

    /// Convert to the display service's document shape
    pub fn export(&self) -> LayoutDocument<'_> {
        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Item::Text(text) => ItemDocument::Text(TextData {
                    text: &text.text,
                    id: format!("text-{index}"),
                    text_color: text.color,
                    background_color: text.background_color,
                    font: text.font,
                    text_align: text.align,
                    line_space: 0,
                    block: Block::new(text.position, text.size),
                    offset: Point {
                        x: text.offset.0,
                        y: text.offset.1,
                    },
                }),
                Item::BottomButtons(buttons) => ItemDocument::BottomCustomButtons {
                    list: buttons.slots(),
                },
                Item::Rectangle(rect) => ItemDocument::Rectangle(RectangleData {
                    stroke_thickness: rect.stroke_width,
                    block: Block::new(rect.position, rect.size),
                    fill_color: rect.fill,
                    stroke_color: rect.stroke,
                }),
            })
            .collect();

        LayoutDocument {
            background: Background {
                bg_color: self.background,
                enable_button_zone: self.button_zone,
            },
            items,
            options: Options {
                poll_rate: self.poll_rate,
                refresh_screen: true,
            },
        }
    }
}

/// Wire form of a [`Layout`]
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDocument<'a> {
    /// Panel background settings
    pub background: Background,
    /// Items in drawing order
    pub items: Vec<ItemDocument<'a>>,
    /// Refresh options
    pub options: Options,
}

/// Background section of a [`LayoutDocument`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Background {
    /// Panel color
    pub bg_color: Color,
    /// Reserve the button strip
    pub enable_button_zone: bool,
}

/// Options section of a [`LayoutDocument`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Node poll rate in milliseconds
    pub poll_rate: u32,
    /// Redraw the whole panel
    pub refresh_screen: bool,
}

/// Wire form of an [`Item`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ItemDocument<'a> {
    /// `TEXT` item
    #[serde(rename = "TEXT")]
    Text(TextData<'a>),
    /// `BOTTOM_CUSTOM_BUTTONS` item
    #[serde(rename = "BOTTOM_CUSTOM_BUTTONS")]
    BottomCustomButtons {
        /// Exactly [`BUTTON_SLOTS`] slots
        list: Vec<ButtonSlot<'a>>,
    },
    /// `RECTANGLE` item
    #[serde(rename = "RECTANGLE")]
    Rectangle(RectangleData),
}

/// Payload of a `TEXT` item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData<'a> {
    /// String to draw
    pub text: &'a str,
    /// Unique within the document
    pub id: String,
    /// Foreground color
    pub text_color: Color,
    /// Block fill color
    pub background_color: Color,
    /// Typeface
    pub font: Font,
    /// Horizontal alignment
    pub text_align: Align,
    /// Extra spacing between lines
    pub line_space: u32,
    /// Bounding block
    pub block: Block,
    /// Text offset inside the block
    pub offset: Point,
}

/// Payload of a `RECTANGLE` item
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectangleData {
    /// Outline thickness in pixels
    pub stroke_thickness: u32,
    /// Bounding block
    pub block: Block,
    /// Fill color, omitted when hollow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<Color>,
    /// Outline color, omitted when unstroked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,
}

/// Positioned rectangle on the panel
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Block {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Block {
    fn new(position: (i32, i32), size: (u32, u32)) -> Self {
        Self {
            x: position.0,
            y: position.1,
            w: size.0,
            h: size.1,
        }
    }
}

/// Pixel offset
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Point {
    /// Horizontal
    pub x: i32,
    /// Vertical
    pub y: i32,
}

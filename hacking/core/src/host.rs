//! Host Platform Traits
//!
//! Everything the session core needs from the game host, split into the
//! services the host actually provides. The core never renders, polls
//! devices, plays audio, or reads a wall clock on its own; it only talks to
//! these traits.
//!
//! # Design Philosophy
//!
//! The host is a "dumb" service provider. The rendering surface accepts
//! structured method calls and hands back asynchronous return handles that
//! the core polls once per tick. Nothing here blocks.

use serde::{Deserialize, Serialize};

/// Opaque reference to a loaded rendering surface
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceHandle(pub i32);

/// Opaque reference to an in-flight method return value
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReturnHandle(pub i32);

/// A single method parameter pushed to the surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum MethodArg {
    /// Integer parameter
    Int(i32),
    /// Float parameter
    Float(f32),
    /// Boolean parameter
    Bool(bool),
    /// Text parameter (pushed as a plain string component)
    Str(String),
}

/// A structured method call on the rendering surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    /// Method name on the surface (e.g. `SET_LIVES`)
    pub name: String,
    /// Parameters, in push order
    pub args: Vec<MethodArg>,
}

impl MethodCall {
    /// Begin a call with no parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Push an integer parameter
    #[must_use]
    pub fn int(mut self, value: i32) -> Self {
        self.args.push(MethodArg::Int(value));
        self
    }

    /// Push a float parameter
    #[must_use]
    pub fn float(mut self, value: f32) -> Self {
        self.args.push(MethodArg::Float(value));
        self
    }

    /// Push a boolean parameter
    #[must_use]
    pub fn bool(mut self, value: bool) -> Self {
        self.args.push(MethodArg::Bool(value));
        self
    }

    /// Push a string parameter
    #[must_use]
    pub fn string(mut self, value: impl Into<String>) -> Self {
        self.args.push(MethodArg::Str(value.into()));
        self
    }
}

/// RGBA tint used when drawing the surface fullscreen
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba {
    /// Opaque white (no tint)
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

/// Interactive overlay surface owned by the host
pub trait RenderSurface {
    /// Request a new surface instance for the named movie
    fn create(&mut self, movie: &str) -> SurfaceHandle;

    /// Whether the surface has finished loading
    fn is_ready(&self, handle: SurfaceHandle) -> bool;

    /// Invoke a method, discarding any return value
    fn invoke(&mut self, handle: SurfaceHandle, call: &MethodCall);

    /// Invoke a method and get a handle to its future return value
    fn invoke_with_return(&mut self, handle: SurfaceHandle, call: &MethodCall) -> ReturnHandle;

    /// Whether the return value behind `handle` can be read
    fn is_return_ready(&self, handle: ReturnHandle) -> bool;

    /// Read a ready return value as an integer
    fn read_return_int(&mut self, handle: ReturnHandle) -> i32;

    /// Draw the surface over the whole screen for this frame
    fn draw_fullscreen(&mut self, handle: SurfaceHandle, tint: Rgba);

    /// Release the surface
    fn release(&mut self, handle: SurfaceHandle);
}

/// Raw input polling
pub trait InputSource {
    /// Whether `code` in control `group` went down this frame
    fn was_just_pressed(&self, group: u32, code: u32) -> bool;
}

/// Fire-and-forget audio
pub trait AudioCues {
    /// Play a frontend sound from the default sound set
    fn play_frontend(&mut self, sound: &str);

    /// Play a speech line on the local player
    fn play_speech(&mut self, speech: &str, params: &str);
}

/// Process-wide player control
pub trait HostControl {
    /// Enable or disable player input
    fn set_input_enabled(&mut self, enabled: bool);
}

/// Monotonic time source
pub trait Clock {
    /// Milliseconds on a monotonic clock
    fn now_ms(&self) -> u64;
}

/// Everything a session needs from the host
pub trait Host: RenderSurface + InputSource + AudioCues + HostControl + Clock {}

impl<T> Host for T where T: RenderSurface + InputSource + AudioCues + HostControl + Clock {}

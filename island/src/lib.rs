//! Island map engine for the portfolio's explorable overworld.
//!
//! The crate owns everything about the map that isn't DOM: the inertial
//! pan/zoom camera over a fixed-size world canvas, hit-testing hotspots and
//! buildings, the Hidden → Spawning → Built discovery cycle with its
//! persisted progress, gesture locks, and viewport-safe placement of the
//! popovers that open over buildings. It compiles natively for tests and the
//! `islandsim` driver, and to WebAssembly for the browser host, which only
//! forwards events and applies the [`engine::Action`]s it gets back.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`], the single handle hosts talk to |
//! | [`wasm`] | `wasm-bindgen` export and `localStorage` store |
//! | [`controller`] | Camera controller: targets, inertia, zoom anchor, focus |
//! | [`camera`] | Geometry types and world/screen conversions |
//! | [`input`] | Pointer event types and the gesture state machine |
//! | [`hit`] | Hit-testing hotspot icons and buildings |
//! | [`discovery`] | Discovery state machine, spawn and hover timers |
//! | [`placement`] | Popover and details placement solver |
//! | [`content`] | Scene content parsed from CMS JSON |
//! | [`storage`] | Key-value persistence of progress and transforms |
//! | [`locks`] | Named gesture locks |
//! | [`observe`] | Listener lists for subscriptions |
//! | [`config`] | Tuning configuration |
//! | [`consts`] | Shared numeric constants (feel, bounds, sizes) |

pub mod camera;
pub mod config;
pub mod consts;
pub mod content;
pub mod controller;
pub mod discovery;
pub mod engine;
pub mod hit;
pub mod input;
pub mod locks;
pub mod observe;
pub mod placement;
pub mod storage;
pub mod wasm;

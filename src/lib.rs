// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Spherical-coordinate camera and visibility culling for BIM model viewers.
//!
//! Spheric owns the camera side of a model viewer: an orbit/first-person
//! camera whose pose is expressed as `(theta, phi, distance, at)`, a set of
//! animators that move the current pose toward a target pose one frame at a
//! time, and a culling pipeline that decides which drawables (and which part
//! of their index buffers) reach the GPU.
//!
//! # Key entry points
//!
//! - [`camera::SceneCamera`] - the camera hosts drive every frame
//! - [`camera::CameraManipulator`] - maps pointer, touch and key input to
//!   camera gestures
//! - [`animation::CameraAnimator`] - the six pose animators
//! - [`culling::Cull`] - clip, frustum, zero-area and BIM culling
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Frame loop
//!
//! Input handlers only touch the *target* pose. Once per frame the host calls
//! [`camera::SceneCamera::update`], which advances the bound animator,
//! rebuilds the view and projection matrices and refreshes the per-frame cull
//! state. The renderer then asks [`camera::SceneCamera::cull`] about each
//! drawable before issuing its draw call.

pub mod animation;
pub mod camera;
pub mod culling;
pub mod error;
pub mod input;
pub mod options;
pub mod scene;
pub mod util;

pub use error::SphericError;

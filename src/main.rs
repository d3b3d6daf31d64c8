//! # Voxel Face Viewer
//!
//! Opens a window showing a row of voxels textured through the side-face
//! atlas stage. Calls into the library's `run()` function.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! ```

fn main() {
    voxel_face_shading::run();
}

//! # Graphics Resources Builder
//!
//! Creates the window and WebGPU context the viewer renders with.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use log::info;
use wgpu::{Adapter, Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

/// Contains all graphics-related resources required by the viewer.
///
/// Created once during startup and handed over to the viewer state, which
/// takes ownership of the surface, device and queue.
#[allow(dead_code)]
#[derive(Default)]
pub struct Graphics {
    /// The viewer window
    pub window: Option<Arc<Window>>,
    /// Handle to the GPU backends
    pub instance: Option<Instance>,
    /// Surface presenting into `window`
    pub surface: Option<Surface<'static>>,
    /// Configuration `surface` was configured with
    pub surface_config: Option<SurfaceConfiguration>,
    /// The selected adapter
    pub adapter: Option<Adapter>,
    /// Logical device
    pub device: Option<Device>,
    /// Command queue of `device`
    pub queue: Option<Queue>,
    /// Whether `surface` is ready to render into
    pub is_surface_configured: bool,
}

/// Asynchronously creates and initializes all required graphics resources.
///
/// # Arguments
/// * `event_loop` - The active event loop used to create the window and surface
/// * `window_title` - Title of the created window
///
/// # Returns
/// A `Future` that resolves to the initialized `Graphics` when complete
///
/// # Panics
/// Panics if no window, surface, adapter or device can be created.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    window_title: &str,
) -> impl Future<Output = Graphics> + 'static {
    let window_attrs = Window::default_attributes().with_title(window_title);
    let window = Arc::new(
        event_loop
            .create_window(window_attrs)
            .expect("Failed to create window"),
    );

    // The instance is a handle to our GPU
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let surface = instance
        .create_surface(window.clone())
        .expect("Failed to create surface");

    async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("No compatible graphics adapter");

        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .expect("Failed to request device");

        let size = window.inner_size();

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);
        Graphics {
            window: Some(window),
            instance: Some(instance),
            surface: Some(surface),
            surface_config: Some(surface_config),
            adapter: Some(adapter),
            device: Some(device),
            queue: Some(queue),
            is_surface_configured: true,
        }
    }
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<Graphics>>,
    window_title: String,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are fully initialized and ready for use
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop_proxy` - Used to send the initialized graphics resources back to the main thread
    /// * `window_title` - Title of the window to open
    pub fn new(event_loop_proxy: EventLoopProxy<Graphics>, window_title: String) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            window_title,
        }
    }

    /// Creates the graphics resources and sends them back through the event loop proxy.
    ///
    /// # Arguments
    /// * `event_loop` - The active event loop used to create the graphics context
    ///
    /// # Panics
    /// Panics if sending the resources back fails
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx = pollster::block_on(create_graphics(event_loop, &self.window_title));
        assert!(event_loop_proxy.send_event(gfx).is_ok());
    }
}

//! Presentation surfaces tied to a window.

use crate::api::VulkanApi;
use crate::error::Result;
use crate::instance::Instance;
use ash::vk;

/// The window-system side of presentation.
///
/// Implemented by platform windows for the backend they can present through.
pub trait PresentationWindow<A: VulkanApi> {
    /// Instance extension names the window system needs to present into
    /// this window.
    fn required_extensions(&self) -> Result<Vec<String>>;

    /// Create a surface for this window on `instance`.
    ///
    /// # Safety
    /// `instance` must be alive and must have been created with every
    /// extension from [`Self::required_extensions`].
    unsafe fn create_surface(&self, api: &A, instance: &A::Instance) -> Result<vk::SurfaceKHR>;
}

/// An owned presentation surface, destroyed on drop.
///
/// Borrows both the instance and the window it was created from.
pub struct Surface<'i, A: VulkanApi> {
    instance: &'i Instance<'i, A>,
    raw: vk::SurfaceKHR,
}

impl<'i, A: VulkanApi> Surface<'i, A> {
    /// Create a surface for `window` on `instance`.
    pub fn new<W>(instance: &'i Instance<'i, A>, window: &'i W) -> Result<Self>
    where
        W: PresentationWindow<A>,
    {
        // SAFETY: the instance is borrowed for the surface's whole lifetime.
        let raw = unsafe { window.create_surface(instance.api(), instance.raw()) }?;
        tracing::info!("Surface created");
        Ok(Self { instance, raw })
    }

    pub fn raw(&self) -> vk::SurfaceKHR {
        self.raw
    }
}

impl<A: VulkanApi> Drop for Surface<'_, A> {
    fn drop(&mut self) {
        // SAFETY: the owning instance outlives this borrow.
        unsafe {
            self.instance
                .api()
                .destroy_surface(self.instance.raw(), self.raw);
        }
        tracing::debug!("Surface destroyed");
    }
}

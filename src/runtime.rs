//! Platform glue: task spawning, timers, and `Send` bounds that only apply
//! on native targets.

use std::future::Future;
use std::time::Duration;

/// `Send` on native, nothing on wasm32 (single-threaded event loop).
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSend: Send {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Send + ?Sized> MaybeSend for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSend {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSend for T {}

/// `Sync` on native, nothing on wasm32.
#[cfg(not(target_arch = "wasm32"))]
pub trait MaybeSync: Sync {}
#[cfg(not(target_arch = "wasm32"))]
impl<T: Sync + ?Sized> MaybeSync for T {}

#[cfg(target_arch = "wasm32")]
pub trait MaybeSync {}
#[cfg(target_arch = "wasm32")]
impl<T: ?Sized> MaybeSync for T {}

/// Run `fut` in the background.
///
/// Returns `false` when no executor is available (native code called
/// outside a tokio runtime); the future is dropped in that case.
#[cfg(not(target_arch = "wasm32"))]
pub fn spawn<F>(fut: F) -> bool
where
    F: Future<Output = ()> + MaybeSend + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(fut);
            true
        }
        Err(_) => {
            tracing::warn!("No tokio runtime available, background task dropped");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn spawn<F>(fut: F) -> bool
where
    F: Future<Output = ()> + MaybeSend + 'static,
{
    wasm_bindgen_futures::spawn_local(fut);
    true
}

/// Timer that works on both native and wasm32.
pub async fn sleep(duration: Duration) {
    if duration.is_zero() {
        return;
    }
    futures_timer::Delay::new(duration).await;
}

use wasm_bindgen::prelude::*;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};

/// Browser resources tied to one rendered graph.
///
/// A new session is created for every graph payload and the previous one is
/// dropped first, which disconnects its observer.
pub struct RenderSession {
	observer: ResizeObserver,
	_on_resize: Closure<dyn FnMut(js_sys::Array)>,
}

impl RenderSession {
	/// Calls `on_resize(width, height)` with the content box of `target`
	/// whenever it changes size.
	pub fn observe(
		target: &Element,
		mut on_resize: impl FnMut(f64, f64) + 'static,
	) -> Result<Self, JsValue> {
		let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
			for entry in entries.iter() {
				let rect = entry.unchecked_into::<ResizeObserverEntry>().content_rect();
				on_resize(rect.width(), rect.height());
			}
		});
		let observer = ResizeObserver::new(on_resize.as_ref().unchecked_ref())?;
		observer.observe(target);
		Ok(Self {
			observer,
			_on_resize: on_resize,
		})
	}
}

impl Drop for RenderSession {
	fn drop(&mut self) {
		self.observer.disconnect();
	}
}

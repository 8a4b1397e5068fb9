pub mod flow_table;
pub mod gateway_form;
pub mod modal;

use std::future::Future;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::debug_log;
use crate::pages::Notice;

/// A mounted page the DOM glue can re-render.
pub trait Screen: 'static {
    /// Used in console messages.
    const NAME: &'static str;

    fn render(document: &Document, page: &Rc<Self>) -> Result<(), JsValue>;

    /// False once the page was unmounted.  Late results of a detached page
    /// must not touch the DOM, which may already belong to a new mount.
    fn is_attached(&self) -> bool;
}

/// Run an intent, toast its notice and re-render once it settles.
pub fn spawn_intent<P, F, Fut>(document: Document, page: Rc<P>, intent: F)
where
    P: Screen,
    F: FnOnce(Rc<P>) -> Fut + 'static,
    Fut: Future<Output = Option<Notice>> + 'static,
{
    if !page.is_attached() {
        return;
    }
    let fut = intent(page.clone());
    {
        let document = document.clone();
        let page = page.clone();
        spawn_local(async move {
            let notice = fut.await;
            if !page.is_attached() {
                debug_log!("{}: dropping result of a detached page", P::NAME);
                return;
            }
            if let Some(notice) = notice {
                notice.show();
            }
            render_or_log(&document, &page);
        });
    }
    // Queued after the intent's first poll, so loading/saving is visible.
    spawn_local(async move {
        render_or_log(&document, &page);
    });
}

pub fn render_or_log<P: Screen>(document: &Document, page: &Rc<P>) {
    if !page.is_attached() {
        return;
    }
    if let Err(e) = P::render(document, page) {
        web_sys::console::error_1(&format!("Failed to render {}: {:?}", P::NAME, e).into());
    }
}

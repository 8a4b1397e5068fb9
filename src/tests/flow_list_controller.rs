use std::rc::Rc;
use std::task::Poll;

use futures::executor::block_on;
use proptest::prelude::*;

use super::fake_api::{deferred, flow, page, poll_once, FakeApi, Scripted};
use crate::controllers::{DeleteOutcome, FetchOutcome, FlowListController};
use crate::error::ApiError;
use crate::models::{BatchDeleteReport, FlowListQuery};

fn controller() -> (Rc<FakeApi>, FlowListController) {
    let api = Rc::new(FakeApi::default());
    let controller = FlowListController::new(api.clone());
    (api, controller)
}

fn ids(controller: &FlowListController) -> Vec<String> {
    controller.state().items.into_iter().map(|f| f.id).collect()
}

#[test]
fn later_issued_fetch_wins_even_when_it_resolves_first() {
    let (api, controller) = controller();
    let (tx_a, reply_a) = deferred();
    let (tx_b, reply_b) = deferred();
    api.push_list(reply_a);
    api.push_list(reply_b);

    let mut a = Box::pin(controller.fetch_flows(FlowListQuery::default().with_search("a")));
    let mut b = Box::pin(controller.fetch_flows(FlowListQuery::default().with_search("b")));
    assert!(poll_once(&mut a).is_pending());
    assert!(poll_once(&mut b).is_pending());
    assert!(controller.state().loading);

    tx_b.send(Ok(page(&["b-1"], 1))).unwrap();
    assert_eq!(poll_once(&mut b), Poll::Ready(Ok(FetchOutcome::Applied)));

    tx_a.send(Ok(page(&["a-1", "a-2"], 2))).unwrap();
    assert_eq!(poll_once(&mut a), Poll::Ready(Ok(FetchOutcome::Superseded)));

    assert_eq!(ids(&controller), vec!["b-1"]);
    assert_eq!(controller.state().total_elements, 1);
    assert_eq!(controller.committed_query().search_text, "b");
    assert!(!controller.state().loading);
}

#[test]
fn earlier_fetch_resolving_first_is_still_dropped() {
    let (api, controller) = controller();
    let (tx_a, reply_a) = deferred();
    let (tx_b, reply_b) = deferred();
    api.push_list(reply_a);
    api.push_list(reply_b);

    let mut a = Box::pin(controller.fetch_flows(FlowListQuery::default().with_search("a")));
    let mut b = Box::pin(controller.fetch_flows(FlowListQuery::default().with_search("b")));
    assert!(poll_once(&mut a).is_pending());
    assert!(poll_once(&mut b).is_pending());

    tx_a.send(Ok(page(&["a-1"], 1))).unwrap();
    assert_eq!(poll_once(&mut a), Poll::Ready(Ok(FetchOutcome::Superseded)));
    assert!(controller.state().items.is_empty());
    assert!(controller.state().loading);

    tx_b.send(Ok(page(&["b-1"], 1))).unwrap();
    assert_eq!(poll_once(&mut b), Poll::Ready(Ok(FetchOutcome::Applied)));
    assert_eq!(ids(&controller), vec!["b-1"]);
}

#[test]
fn stale_failure_does_not_surface() {
    let (api, controller) = controller();
    let (tx_a, reply_a) = deferred();
    let (tx_b, reply_b) = deferred();
    api.push_list(reply_a);
    api.push_list(reply_b);

    let mut a = Box::pin(controller.refresh());
    let mut b = Box::pin(controller.refresh());
    assert!(poll_once(&mut a).is_pending());
    assert!(poll_once(&mut b).is_pending());

    tx_a.send(Err(ApiError::request("timeout"))).unwrap();
    assert_eq!(poll_once(&mut a), Poll::Ready(Ok(FetchOutcome::Superseded)));
    tx_b.send(Ok(page(&["f-1"], 1))).unwrap();
    assert_eq!(poll_once(&mut b), Poll::Ready(Ok(FetchOutcome::Applied)));
}

#[test]
fn failed_fetch_keeps_previous_rows() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-1", "f-2"], 2))));
    api.push_list(Scripted::Ready(Err(ApiError::request("boom"))));

    block_on(controller.refresh()).unwrap();
    let err = block_on(controller.change_page(1)).unwrap_err();

    assert_eq!(err.to_string(), "boom");
    let state = controller.state();
    assert_eq!(ids(&controller), vec!["f-1", "f-2"]);
    assert_eq!(state.total_elements, 2);
    assert_eq!(state.current_page, 0);
    assert_eq!(state.page_size, 20);
    assert_eq!(state.search_query, "");
    assert!(!state.loading);
}

#[test]
fn failed_search_leaves_applied_page_alone() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-41", "f-42"], 42))));
    block_on(controller.change_page(2)).unwrap();
    let before = controller.state();

    controller.set_search_query("pipe");
    api.push_list(Scripted::Ready(Err(ApiError::request("boom"))));
    block_on(controller.submit_search()).unwrap_err();

    let after = controller.state();
    assert_eq!(api.last_list_call().unwrap().search_text, "pipe");
    assert_eq!(api.last_list_call().unwrap().page_index, 0);
    assert_eq!(after.current_page, 2);
    assert_eq!(after.page_size, 20);
    assert_eq!(after.search_query, "pipe");
    assert_eq!(after.items, before.items);
    assert_eq!(after.total_elements, 42);
    assert_eq!(controller.committed_query(), before_query(2));
}

#[test]
fn failed_page_size_change_keeps_size_and_page() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    block_on(controller.change_page(1)).unwrap();

    api.push_list(Scripted::Ready(Err(ApiError::request("boom"))));
    block_on(controller.change_page_size(50)).unwrap_err();

    let state = controller.state();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.page_size, 20);
    assert_eq!(ids(&controller), vec!["f-21"]);
}

fn before_query(page_index: u32) -> FlowListQuery {
    FlowListQuery {
        page_index,
        page_size: 20,
        search_text: String::new(),
    }
}

#[test]
fn page_size_change_requests_first_page() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-41"], 60))));
    api.push_list(Scripted::Ready(Ok(page(&["f-1"], 60))));

    block_on(controller.change_page(2)).unwrap();
    assert_eq!(controller.state().current_page, 2);

    block_on(controller.change_page_size(50)).unwrap();
    let issued = api.last_list_call().unwrap();
    assert_eq!(issued.page_index, 0);
    assert_eq!(issued.page_size, 50);
    assert_eq!(controller.state().current_page, 0);
    assert_eq!(controller.state().page_size, 50);
}

#[test]
fn new_search_text_overrides_requested_page() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&[], 0))));

    let query = FlowListQuery {
        page_index: 3,
        page_size: 20,
        search_text: "order".into(),
    };
    block_on(controller.fetch_flows(query)).unwrap();
    assert_eq!(api.last_list_call().unwrap().page_index, 0);
    assert_eq!(controller.committed_query().search_text, "order");
}

#[test]
fn typing_search_text_resets_pending_page() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    block_on(controller.change_page(1)).unwrap();

    controller.set_search_query("pipe");
    assert_eq!(controller.query().page_index, 0);
    assert_eq!(controller.query().search_text, "pipe");
    // Nothing is sent until the search is submitted, and the list on screen
    // still shows page 2.
    assert_eq!(api.list_call_count(), 1);
    assert_eq!(controller.state().current_page, 1);
}

#[test]
fn paging_ignores_unsubmitted_search_text() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-1"], 45))));
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    block_on(controller.refresh()).unwrap();

    controller.set_search_query("pipe");
    block_on(controller.change_page(1)).unwrap();

    let sent = api.last_list_call().unwrap();
    assert_eq!(sent.page_index, 1);
    assert_eq!(sent.search_text, "");
    assert_eq!(controller.state().current_page, 1);
}

#[test]
fn surrounding_whitespace_is_not_a_new_search() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    let query = FlowListQuery {
        page_index: 1,
        page_size: 20,
        search_text: "order".into(),
    };
    // First fetch with new search text lands on page 0; page through it.
    block_on(controller.fetch_flows(query.clone())).unwrap();
    block_on(controller.change_page(1)).unwrap();

    controller.set_search_query("  order ");
    assert_eq!(controller.state().search_query, "order");
    assert_eq!(controller.query().page_index, 1);

    let padded = FlowListQuery {
        search_text: " order  ".into(),
        ..query
    };
    api.push_list(Scripted::Ready(Ok(page(&["f-21"], 45))));
    block_on(controller.fetch_flows(padded)).unwrap();
    let sent = api.last_list_call().unwrap();
    assert_eq!(sent.search_text, "order");
    assert_eq!(sent.page_index, 1);
}

#[test]
fn successful_delete_refetches_committed_query_once() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-21", "f-22"], 22))));
    block_on(controller.change_page(1)).unwrap();
    let committed = controller.committed_query();

    api.delete_replies.borrow_mut().push_back(Scripted::Ready(Ok(())));
    api.push_list(Scripted::Ready(Ok(page(&["f-22"], 21))));
    let outcome = block_on(controller.delete_flow("f-21")).unwrap();

    assert_eq!(outcome, DeleteOutcome::Refreshed(FetchOutcome::Applied));
    assert_eq!(*api.delete_calls.borrow(), vec!["f-21"]);
    assert_eq!(api.list_call_count(), 2);
    assert_eq!(api.last_list_call().unwrap(), committed);
    assert_eq!(ids(&controller), vec!["f-22"]);
}

#[test]
fn failed_delete_does_not_refetch() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-1"], 1))));
    block_on(controller.refresh()).unwrap();

    api.delete_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Err(ApiError::request("Flow is in use"))));
    let err = block_on(controller.delete_flow("f-1")).unwrap_err();

    assert_eq!(err.to_string(), "Flow is in use");
    assert_eq!(api.list_call_count(), 1);
    assert_eq!(ids(&controller), vec!["f-1"]);
}

#[test]
fn refresh_failure_after_delete_is_reported_separately() {
    let (api, controller) = controller();
    api.delete_replies.borrow_mut().push_back(Scripted::Ready(Ok(())));
    api.push_list(Scripted::Ready(Err(ApiError::request("timeout"))));

    let outcome = block_on(controller.delete_flow("f-1")).unwrap();
    assert_eq!(outcome, DeleteOutcome::RefreshFailed(ApiError::request("timeout")));
}

#[test]
fn create_returns_new_flow_without_touching_list() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-1"], 1))));
    block_on(controller.refresh()).unwrap();

    let mut created = flow("f-123", false);
    created.name = "Order Pipeline".into();
    api.create_replies.borrow_mut().push_back(Scripted::Ready(Ok(created)));

    let flow = block_on(controller.create_flow("Order Pipeline", Some(""))).unwrap();
    assert_eq!(flow.id, "f-123");

    let calls = api.create_calls.borrow();
    assert_eq!(calls[0].name, "Order Pipeline");
    assert_eq!(calls[0].description, None);
    assert_eq!(api.list_call_count(), 1);
    assert_eq!(ids(&controller), vec!["f-1"]);
    assert!(!controller.state().creating);
}

#[test]
fn blank_name_is_rejected_before_request() {
    let (api, controller) = controller();
    let err = block_on(controller.create_flow("   ", None)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(err.field_message("name"), Some("Flow name is required"));
    assert!(api.create_calls.borrow().is_empty());
}

#[test]
fn second_create_while_one_is_pending_is_busy() {
    let (api, controller) = controller();
    let (tx, reply) = deferred();
    api.create_replies.borrow_mut().push_back(reply);

    let mut first = Box::pin(controller.create_flow("One", None));
    assert!(poll_once(&mut first).is_pending());
    assert!(controller.state().creating);

    assert_eq!(block_on(controller.create_flow("Two", None)), Err(ApiError::Busy));
    assert_eq!(block_on(controller.clone_flow("f-1", None)), Err(ApiError::Busy));

    tx.send(Ok(flow("f-1", false))).unwrap();
    assert!(matches!(poll_once(&mut first), Poll::Ready(Ok(_))));
    assert!(!controller.state().creating);
    assert_eq!(api.create_calls.borrow().len(), 1);
}

#[test]
fn clone_passes_optional_name() {
    let (api, controller) = controller();
    api.clone_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Ok(flow("f-2", false))));

    let copy = block_on(controller.clone_flow("f-1", Some("Copy of Flow f-1"))).unwrap();
    assert_eq!(copy.id, "f-2");
    assert_eq!(
        *api.clone_calls.borrow(),
        vec![("f-1".to_string(), Some("Copy of Flow f-1".to_string()))]
    );
}

#[test]
fn delete_selected_sends_ids_and_clears_selection() {
    let (api, controller) = controller();
    api.push_list(Scripted::Ready(Ok(page(&["f-1", "f-2", "f-3"], 3))));
    block_on(controller.refresh()).unwrap();

    controller.toggle_selected("f-2");
    controller.toggle_selected("f-1");
    api.batch_replies
        .borrow_mut()
        .push_back(Scripted::Ready(Ok(BatchDeleteReport { deleted: 2, total: 2 })));
    api.push_list(Scripted::Ready(Ok(page(&["f-3"], 1))));

    let (report, outcome) = block_on(controller.delete_selected()).unwrap();
    assert_eq!(report.deleted, 2);
    assert_eq!(outcome, DeleteOutcome::Refreshed(FetchOutcome::Applied));
    assert_eq!(*api.batch_calls.borrow(), vec![vec!["f-1".to_string(), "f-2".to_string()]]);
    assert!(controller.state().selected.is_empty());
}

#[test]
fn delete_selected_needs_a_selection() {
    let (api, controller) = controller();
    let err = block_on(controller.delete_selected()).unwrap_err();
    assert_eq!(err.to_string(), "No flows selected");
    assert!(api.batch_calls.borrow().is_empty());
}

#[test]
fn selection_is_pruned_to_visible_rows() {
    let (api, controller) = controller();
    controller.toggle_selected("f-9");
    controller.toggle_selected("f-1");
    api.push_list(Scripted::Ready(Ok(page(&["f-1", "f-2"], 2))));

    block_on(controller.refresh()).unwrap();
    let selected: Vec<String> = controller.state().selected.into_iter().collect();
    assert_eq!(selected, vec!["f-1"]);
}

proptest! {
    #[test]
    fn applied_page_never_exceeds_page_size(size in 1u32..40, returned in 0usize..80, total in 0u64..500) {
        let api = Rc::new(FakeApi::default());
        let controller = FlowListController::with_page_size(api.clone(), size);
        let names: Vec<String> = (0..returned).map(|i| format!("f-{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        api.push_list(Scripted::Ready(Ok(page(&refs, total))));

        let outcome = block_on(controller.refresh()).unwrap();
        prop_assert_eq!(outcome, FetchOutcome::Applied);
        let state = controller.state();
        prop_assert!(state.items.len() <= size as usize);
        prop_assert_eq!(state.items.len(), returned.min(size as usize));
        prop_assert_eq!(state.total_elements, total);
    }
}

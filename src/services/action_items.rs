use super::meetings::check_responsible;
use super::views::{self, ActionItemQuery, ActionItemView, Names, ProgressCounts};
use super::{caller_and_roster, Clock};
use crate::db::Store;
use crate::domain::access;
use crate::domain::models::{ActionItem, ActionItemUpdate, Meeting, NewActionItem, Progress};
use crate::domain::progress::{self, ProgressChange};
use crate::domain::validation;
use crate::error::{CoreError, CoreResult};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct ActionItemListing {
    /// Counts over every visible, non-archived item, before the progress filter.
    pub counts: ProgressCounts,
    pub items: Vec<ActionItemView>,
}

pub async fn list(
    store: &dyn Store,
    email: &str,
    query: &ActionItemQuery,
    clock: Clock,
) -> CoreResult<ActionItemListing> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    let visible: Vec<ActionItem> = store
        .list_action_items()
        .await?
        .into_iter()
        .filter(|item| access::can_view_action_item(&caller, item))
        .collect();

    let counts = views::progress_counts(visible.iter().filter(|i| i.progress != Progress::Archived));

    let meetings = store.list_meetings().await?;
    let meetings_by_id: HashMap<Uuid, &Meeting> = meetings.iter().map(|m| (m.id, m)).collect();
    let names = Names::new(&employees);

    let mut items: Vec<ActionItemView> = visible
        .into_iter()
        .filter(|item| query.includes(item.progress))
        .map(|item| views::action_item_view(item, &meetings_by_id, &names, clock.today))
        .collect();
    views::sort_action_items(&mut items, query.sort, query.order);

    Ok(ActionItemListing { counts, items })
}

pub async fn create(
    store: &dyn Store,
    email: &str,
    input: NewActionItem,
    clock: Clock,
) -> CoreResult<ActionItem> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    if !access::can_create_action_items(&caller) {
        return Err(CoreError::Forbidden);
    }
    let text = validation::required("text", &input.text)?;
    check_responsible(&employees, input.responsible_id)?;

    let item = ActionItem {
        id: Uuid::new_v4(),
        one_on_one_id: input.one_on_one_id,
        text,
        due_date: input.due_date,
        done: false,
        responsible_id: input.responsible_id,
        created_by: caller.id,
        created_at: clock.now,
        progress: progress::initial_progress(input.due_date, false, clock.today),
    };
    // The store rejects a parent meeting that is missing or was just deleted.
    store.insert_action_item(&item).await?;
    tracing::info!(
        "Action item {} created by {} ({})",
        item.id,
        caller.id,
        item.progress.as_str()
    );
    Ok(item)
}

pub async fn update(
    store: &dyn Store,
    email: &str,
    id: Uuid,
    update: ActionItemUpdate,
    clock: Clock,
) -> CoreResult<ActionItem> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    let mut item = store
        .get_action_item(id)
        .await?
        .ok_or(CoreError::NotFound("action item"))?;
    if !access::can_update_action_item(&caller, &item) {
        return Err(CoreError::Forbidden);
    }

    if let Some(text) = update.text.as_deref() {
        item.text = validation::required("text", text)?;
    }
    if let Some(responsible_id) = update.responsible_id {
        check_responsible(&employees, responsible_id)?;
        item.responsible_id = responsible_id;
    }

    let transition = progress::transition(
        item.progress,
        item.due_date,
        ProgressChange {
            done: update.done,
            progress: update.progress,
            due_date: update.due_date,
        },
        clock.today,
    );
    if let Some(due_date) = update.due_date {
        item.due_date = due_date;
    }
    let previous = item.progress;
    item.progress = transition.progress;
    item.done = transition.done;

    if !store.update_action_item(&item).await? {
        return Err(CoreError::NotFound("action item"));
    }
    if previous != item.progress {
        tracing::info!(
            "Action item {} moved {} -> {} by {}",
            id,
            previous.as_str(),
            item.progress.as_str(),
            caller.id
        );
    }
    Ok(item)
}

pub async fn delete(store: &dyn Store, email: &str, id: Uuid) -> CoreResult<()> {
    let caller = super::resolve_caller(store, email).await?;
    let item = store
        .get_action_item(id)
        .await?
        .ok_or(CoreError::NotFound("action item"))?;
    if !access::can_delete_action_item(&caller, &item) {
        return Err(CoreError::Forbidden);
    }
    store.delete_action_item(id).await?;
    tracing::info!("Action item {} deleted by {}", id, caller.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MeetingStatus, Workload};
    use crate::services::testkit::{self, clock, Team};
    use crate::services::views::{SortKey, SortOrder};
    use chrono::{Duration, Utc};

    async fn meeting_for(team: &Team) -> Meeting {
        let meeting = Meeting {
            id: Uuid::new_v4(),
            employee_id: team.jamie.id,
            person_id: team.lead.id,
            date: clock().today,
            topics: "sync".to_string(),
            status: MeetingStatus::Green,
            workload: Workload::Low,
            created_at: Utc::now(),
        };
        team.store.insert_meeting(&meeting, &[]).await.unwrap();
        meeting
    }

    fn new_item(meeting: &Meeting, text: &str, days_from_today: i64, responsible: Option<Uuid>) -> NewActionItem {
        NewActionItem {
            one_on_one_id: meeting.id,
            text: text.to_string(),
            due_date: clock().today + Duration::days(days_from_today),
            responsible_id: responsible,
        }
    }

    fn texts(listing: &ActionItemListing) -> Vec<&str> {
        listing.items.iter().map(|v| v.item.text.as_str()).collect()
    }

    #[tokio::test]
    async fn test_initial_progress() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        let late = create(&team.store, &team.lead.email, new_item(&meeting, "late", -3, None), clock())
            .await
            .unwrap();
        let fresh = create(&team.store, &team.lead.email, new_item(&meeting, "fresh", 3, None), clock())
            .await
            .unwrap();
        assert_eq!(late.progress, Progress::Overdue);
        assert_eq!(fresh.progress, Progress::InProgress);
        assert!(!late.done);
    }

    #[tokio::test]
    async fn test_lead_listing_scenario() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        create(&team.store, &team.lead.email, new_item(&meeting, "created by lead", 5, Some(team.jamie.id)), clock())
            .await
            .unwrap();
        create(&team.store, &team.hr.email, new_item(&meeting, "assigned to lead", 6, Some(team.lead.id)), clock())
            .await
            .unwrap();
        create(&team.store, &team.hr.email, new_item(&meeting, "unrelated", 5, Some(team.riley.id)), clock())
            .await
            .unwrap();

        let query = ActionItemQuery { sort: SortKey::DueDate, order: SortOrder::Asc, ..Default::default() };
        let lead_view = list(&team.store, &team.lead.email, &query, clock()).await.unwrap();
        assert_eq!(texts(&lead_view), vec!["created by lead", "assigned to lead"]);

        let jamie_view = list(&team.store, &team.jamie.email, &query, clock()).await.unwrap();
        assert_eq!(texts(&jamie_view), vec!["created by lead"]);
        assert_eq!(jamie_view.items[0].employee_name, "Jamie");
        assert_eq!(jamie_view.items[0].created_by_name, "Lee");

        let hr_view = list(&team.store, &team.hr.email, &query, clock()).await.unwrap();
        assert_eq!(hr_view.items.len(), 3);
    }

    #[tokio::test]
    async fn test_done_and_undone_round() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        let item = create(&team.store, &team.lead.email, new_item(&meeting, "late", -2, Some(team.jamie.id)), clock())
            .await
            .unwrap();

        let done = update(
            &team.store,
            &team.jamie.email,
            item.id,
            ActionItemUpdate { done: Some(true), ..Default::default() },
            clock(),
        )
        .await
        .unwrap();
        assert_eq!((done.progress, done.done), (Progress::Done, true));

        let reopened = update(
            &team.store,
            &team.jamie.email,
            item.id,
            ActionItemUpdate { done: Some(false), ..Default::default() },
            clock(),
        )
        .await
        .unwrap();
        assert_eq!((reopened.progress, reopened.done), (Progress::Overdue, false));
    }

    #[tokio::test]
    async fn test_archived_hidden_by_default() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        let item = create(&team.store, &team.hr.email, new_item(&meeting, "old", 1, None), clock())
            .await
            .unwrap();
        create(&team.store, &team.hr.email, new_item(&meeting, "open", -1, None), clock())
            .await
            .unwrap();
        update(
            &team.store,
            &team.hr.email,
            item.id,
            ActionItemUpdate { progress: Some(Progress::Archived), ..Default::default() },
            clock(),
        )
        .await
        .unwrap();

        let default = list(&team.store, &team.hr.email, &ActionItemQuery::default(), clock()).await.unwrap();
        assert_eq!(texts(&default), vec!["open"]);
        assert_eq!(default.counts.total, 1);
        assert_eq!(default.counts.overdue, 1);
        assert!(default.items[0].is_overdue);

        let archived = ActionItemQuery { progress: Some(Progress::Archived), ..Default::default() };
        let listing = list(&team.store, &team.hr.email, &archived, clock()).await.unwrap();
        assert_eq!(texts(&listing), vec!["old"]);
    }

    #[tokio::test]
    async fn test_mutation_permissions() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        let err = create(&team.store, &team.jamie.email, new_item(&meeting, "nope", 1, None), clock())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));

        let item = create(&team.store, &team.lead.email, new_item(&meeting, "mine", 1, Some(team.jamie.id)), clock())
            .await
            .unwrap();
        let err = update(
            &team.store,
            &team.casey.email,
            item.id,
            ActionItemUpdate { done: Some(true), ..Default::default() },
            clock(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CoreError::Forbidden));
        assert!(matches!(
            delete(&team.store, &team.jamie.email, item.id).await,
            Err(CoreError::Forbidden)
        ));
        delete(&team.store, &team.lead.email, item.id).await.unwrap();
        assert!(team.store.get_action_item(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_validates_references() {
        let team = testkit::team().await;
        let meeting = meeting_for(&team).await;
        let ghost_meeting = NewActionItem { one_on_one_id: Uuid::new_v4(), ..new_item(&meeting, "x", 1, None) };
        assert!(matches!(
            create(&team.store, &team.hr.email, ghost_meeting, clock()).await,
            Err(CoreError::Validation(_))
        ));
        let ghost_owner = new_item(&meeting, "x", 1, Some(Uuid::new_v4()));
        assert!(matches!(
            create(&team.store, &team.hr.email, ghost_owner, clock()).await,
            Err(CoreError::Validation(_))
        ));

        team.store.delete_meeting_cascade(meeting.id).await.unwrap();
        assert!(matches!(
            create(&team.store, &team.hr.email, new_item(&meeting, "late", 1, None), clock()).await,
            Err(CoreError::Validation(_))
        ));
    }
}

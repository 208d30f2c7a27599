use super::views::{self, MeetingView, Names};
use super::{caller_and_roster, Clock};
use crate::db::Store;
use crate::domain::access;
use crate::domain::models::{ActionItem, Employee, Meeting, MeetingUpdate, NewMeeting};
use crate::domain::progress;
use crate::domain::validation;
use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use uuid::Uuid;

fn require_writer(caller: &Employee) -> CoreResult<()> {
    if access::can_write_meetings(caller) {
        Ok(())
    } else {
        tracing::warn!("Meeting write denied for {}", caller.id);
        Err(CoreError::Forbidden)
    }
}

fn check_conductor(employees: &[Employee], person_id: Uuid) -> CoreResult<()> {
    match employees.iter().find(|emp| emp.id == person_id) {
        Some(person) if person.user_type.conducts_meetings() => Ok(()),
        Some(_) => Err(CoreError::Validation(
            "person_id: conductor must be a lead or hr".to_string(),
        )),
        None => Err(CoreError::Validation(
            "person_id: conductor does not exist".to_string(),
        )),
    }
}

pub(crate) fn check_responsible(employees: &[Employee], responsible_id: Option<Uuid>) -> CoreResult<()> {
    match responsible_id {
        Some(id) if !employees.iter().any(|emp| emp.id == id) => Err(CoreError::Validation(
            "responsible_id: employee does not exist".to_string(),
        )),
        _ => Ok(()),
    }
}

/// 1:1 history of one employee, newest first. Callers without access get an
/// empty list rather than an error.
pub async fn history(store: &dyn Store, email: &str, employee_id: Uuid) -> CoreResult<Vec<MeetingView>> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    let target = employees.iter().find(|emp| emp.id == employee_id);
    if !access::can_view_meetings(&caller, target) {
        tracing::debug!("Meeting history of {} hidden from {}", employee_id, caller.id);
        return Ok(Vec::new());
    }

    let meetings = store.list_meetings_for_employee(employee_id).await?;
    let mut items: HashMap<Uuid, Vec<ActionItem>> = HashMap::new();
    for meeting in &meetings {
        items.insert(meeting.id, store.list_action_items_for_meeting(meeting.id).await?);
    }
    let names = Names::new(&employees);
    Ok(views::meeting_history(meetings, &names, items))
}

pub async fn create(
    store: &dyn Store,
    email: &str,
    input: NewMeeting,
    clock: Clock,
) -> CoreResult<MeetingView> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    require_writer(&caller)?;

    let topics = validation::required("topics", &input.topics)?;
    if !employees.iter().any(|emp| emp.id == input.employee_id) {
        return Err(CoreError::Validation("employee_id: employee does not exist".to_string()));
    }
    check_conductor(&employees, input.person_id)?;

    let meeting = Meeting {
        id: Uuid::new_v4(),
        employee_id: input.employee_id,
        person_id: input.person_id,
        date: input.date,
        topics,
        status: input.status,
        workload: input.workload,
        created_at: clock.now,
    };

    let mut items = Vec::with_capacity(input.action_items.len());
    for draft in input.action_items {
        check_responsible(&employees, draft.responsible_id)?;
        items.push(ActionItem {
            id: Uuid::new_v4(),
            one_on_one_id: meeting.id,
            text: validation::required("text", &draft.text)?,
            due_date: draft.due_date,
            done: draft.done,
            responsible_id: draft.responsible_id,
            created_by: caller.id,
            created_at: clock.now,
            progress: progress::initial_progress(draft.due_date, draft.done, clock.today),
        });
    }

    store.insert_meeting(&meeting, &items).await?;
    tracing::info!(
        "Meeting {} for {} recorded by {} with {} action items",
        meeting.id,
        meeting.employee_id,
        caller.id,
        items.len()
    );

    let names = Names::new(&employees);
    Ok(MeetingView {
        person_name: names.name_or(Some(meeting.person_id), views::UNKNOWN),
        meeting,
        action_items: items,
    })
}

pub async fn update(
    store: &dyn Store,
    email: &str,
    id: Uuid,
    input: MeetingUpdate,
) -> CoreResult<Meeting> {
    let (caller, employees) = caller_and_roster(store, email).await?;
    require_writer(&caller)?;

    let mut meeting = store.get_meeting(id).await?.ok_or(CoreError::NotFound("meeting"))?;
    check_conductor(&employees, input.person_id)?;

    meeting.topics = validation::required("topics", &input.topics)?;
    meeting.date = input.date;
    meeting.person_id = input.person_id;
    meeting.status = input.status;
    meeting.workload = input.workload;

    if !store.update_meeting(&meeting).await? {
        return Err(CoreError::NotFound("meeting"));
    }
    tracing::info!("Meeting {} updated by {}", id, caller.id);
    Ok(meeting)
}

/// Removes the meeting and every action item under it in one store call.
pub async fn delete(store: &dyn Store, email: &str, id: Uuid) -> CoreResult<()> {
    let caller = super::resolve_caller(store, email).await?;
    require_writer(&caller)?;

    if !store.delete_meeting_cascade(id).await? {
        return Err(CoreError::NotFound("meeting"));
    }
    tracing::info!("Meeting {} deleted by {}", id, caller.id);
    Ok(())
}

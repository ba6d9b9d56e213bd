//! The per-session conversation state machine.
//!
//! A pure reducer: one inbound event against one session yields the next
//! session state plus a render instruction for the transport layer. No IO
//! happens here; the registry index is consulted read-only and every
//! session mutation for a single event is applied before the instruction is
//! returned, or not at all.

use tracing::{debug, warn};

use crate::pagination::next_chunk;
use crate::registry::{specializations_of, ProviderRecord, RegistryIndex};
use crate::search::{search, SearchCriteria, SearchField};
use crate::session::Session;
use crate::taxonomy::{self, PAGE_SIZE};

/// Stage of the per-user conversation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConversationState {
    #[default]
    AwaitingCategory,
    AwaitingSpecialization,
    AwaitingSearchMode,
}

/// Structured menu events delivered by the transport layer.
///
/// Category ids are the stable taxonomy identifiers; specialization ids are
/// ephemeral and only resolve against the map cached by the most recent
/// category selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Category(String),
    Specialization(String),
    GeneralSearch,
    SearchByName,
    SearchByAddress,
    ShowAll,
    ShowMore,
    BackToSearch,
    MainMenu,
    UpdateData,
    Cancel,
}

/// What the transport should render next. The core never touches UI.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderInstruction {
    ShowCategoryMenu,
    ShowSpecializationMenu { options: Vec<(String, String)> },
    ShowSearchOptions,
    ShowResultChunk { records: Vec<ProviderRecord>, has_more: bool },
    ShowNoResults,
    ShowUnknownSelection,
    ShowContactInfo,
    ShowSessionEnded,
}

/// Applies one selection event to the session.
///
/// Unknown identifiers answer with `ShowUnknownSelection` and events that
/// make no sense in the current state re-emit that state's prompt; neither
/// touches the session.
pub fn handle_selection(
    index: &RegistryIndex,
    session: &mut Session,
    selection: Selection,
) -> RenderInstruction {
    use ConversationState::*;

    match (session.state, selection) {
        (_, Selection::MainMenu) => {
            session.reset();
            RenderInstruction::ShowCategoryMenu
        }
        (_, Selection::Cancel) => {
            session.reset();
            RenderInstruction::ShowSessionEnded
        }
        (AwaitingCategory, Selection::Category(id)) => select_category(index, session, &id),
        (AwaitingCategory, Selection::GeneralSearch) => {
            session.reset();
            session.search_field = Some(SearchField::General);
            session.state = AwaitingSearchMode;
            RenderInstruction::ShowSearchOptions
        }
        (AwaitingSpecialization, Selection::Specialization(id)) => {
            select_specialization(session, &id)
        }
        (AwaitingSearchMode, Selection::SearchByName) => {
            session.search_field = Some(SearchField::Name);
            RenderInstruction::ShowSearchOptions
        }
        (AwaitingSearchMode, Selection::SearchByAddress) => {
            session.search_field = Some(SearchField::Address);
            RenderInstruction::ShowSearchOptions
        }
        (AwaitingSearchMode, Selection::ShowAll) => run_search(index, session, None),
        (AwaitingSearchMode, Selection::ShowMore) => emit_chunk(session),
        (AwaitingSearchMode, Selection::BackToSearch) => {
            session.search_field = None;
            session.clear_results();
            RenderInstruction::ShowSearchOptions
        }
        (AwaitingSearchMode, Selection::UpdateData) => RenderInstruction::ShowContactInfo,
        (state, other) => {
            warn!(?state, event = ?other, "Event not valid for state, re-prompting");
            reprompt(session)
        }
    }
}

/// Applies a free-text query. Only meaningful in the search stage; any
/// other state re-prompts without touching the session.
pub fn handle_text(
    index: &RegistryIndex,
    session: &mut Session,
    raw_text: &str,
) -> RenderInstruction {
    if session.state != ConversationState::AwaitingSearchMode {
        warn!(state = ?session.state, "Free text outside the search stage, re-prompting");
        return reprompt(session);
    }
    run_search(index, session, Some(raw_text))
}

/// The current state's prompt, re-emitted unchanged for invalid events.
fn reprompt(session: &Session) -> RenderInstruction {
    match session.state {
        ConversationState::AwaitingCategory => RenderInstruction::ShowCategoryMenu,
        ConversationState::AwaitingSpecialization => RenderInstruction::ShowSpecializationMenu {
            options: session.specialization_map.clone(),
        },
        ConversationState::AwaitingSearchMode => RenderInstruction::ShowSearchOptions,
    }
}

fn select_category(
    index: &RegistryIndex,
    session: &mut Session,
    id: &str,
) -> RenderInstruction {
    let Some(category) = taxonomy::category_by_id(id) else {
        warn!(category_id = id, "Unknown category id");
        return RenderInstruction::ShowUnknownSelection;
    };

    session.selected_category = Some(category.to_string());
    session.selected_specialization = None;
    session.clear_results();

    let filtered = index.filter_by_category(category);
    let specializations = specializations_of(&filtered);
    debug!(
        category,
        records = filtered.len(),
        specializations = specializations.len(),
        "Category selected"
    );

    if specializations.is_empty() {
        session.specialization_map.clear();
        session.state = ConversationState::AwaitingSearchMode;
        RenderInstruction::ShowSearchOptions
    } else {
        session.specialization_map = specializations
            .iter()
            .enumerate()
            .map(|(i, spec)| (i.to_string(), (*spec).to_string()))
            .collect();
        session.state = ConversationState::AwaitingSpecialization;
        RenderInstruction::ShowSpecializationMenu {
            options: session.specialization_map.clone(),
        }
    }
}

fn select_specialization(session: &mut Session, id: &str) -> RenderInstruction {
    let specialization = session
        .specialization_map
        .iter()
        .find(|(sid, _)| sid == id)
        .map(|(_, value)| value.clone());

    let Some(specialization) = specialization else {
        warn!(specialization_id = id, "Unknown specialization id");
        return RenderInstruction::ShowUnknownSelection;
    };

    session.selected_specialization = Some(specialization);
    session.state = ConversationState::AwaitingSearchMode;
    RenderInstruction::ShowSearchOptions
}

/// Runs the filter composer with the session's selections, stores the
/// ordered result set and emits its first page.
fn run_search(
    index: &RegistryIndex,
    session: &mut Session,
    query: Option<&str>,
) -> RenderInstruction {
    let criteria = SearchCriteria {
        category: session.selected_category.clone(),
        specialization: session.selected_specialization.clone(),
        field: session.search_field.unwrap_or_default(),
        query: query.map(str::to_string),
    };

    session.results = search(index, &criteria);
    session.result_offset = 0;
    emit_chunk(session)
}

/// Emits the next page of the stored result set, advancing the offset.
/// An empty page leaves the offset alone and renders as "no results".
fn emit_chunk(session: &mut Session) -> RenderInstruction {
    let chunk = next_chunk(&session.results, session.result_offset, PAGE_SIZE);
    if chunk.records.is_empty() {
        return RenderInstruction::ShowNoResults;
    }

    session.result_offset = chunk.next_offset;
    RenderInstruction::ShowResultChunk {
        records: chunk.records,
        has_more: chunk.has_more,
    }
}

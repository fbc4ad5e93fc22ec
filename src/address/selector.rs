use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::cascade::{address_change_patch, is_offered, reconcile};
use super::loader::{LoadState, LookupError, LookupSource};
use super::lookup::GeographicLookup;
use super::numerals::display_ward;
use super::selection::{AddressLevel, AddressPatch, AddressSelection};

/// Receives every consolidated partial update the selector proposes
pub type ChangeHandler = Arc<dyn Fn(&AddressPatch) + Send + Sync>;

/// Per-level control state: disabled until the parent holds a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelState {
    Disabled,
    Enabled(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelControl {
    pub level: AddressLevel,
    pub value: String,
    pub state: LevelState,
}

impl LevelControl {
    pub fn options(&self) -> &[String] {
        match &self.state {
            LevelState::Enabled(options) => options,
            LevelState::Disabled => &[],
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, LevelState::Enabled(_))
    }
}

/// Control for one level. Disabled while the lookup is not ready, while the
/// parent is empty, or when the parent offers nothing.
pub fn level_control(
    lookup: &GeographicLookup,
    selection: &AddressSelection,
    level: AddressLevel,
    load_state: LoadState,
) -> LevelControl {
    let parent_empty = selection.parent_value(level).is_some_and(str::is_empty);
    let options = lookup.options_for(level, selection);

    let state = if load_state != LoadState::Ready || parent_empty || options.is_empty() {
        LevelState::Disabled
    } else {
        LevelState::Enabled(options.to_vec())
    };

    LevelControl {
        level,
        value: selection.get(level).to_string(),
        state,
    }
}

struct SelectorState {
    lookup: Arc<GeographicLookup>,
    load_state: LoadState,
    selection: AddressSelection,
}

/// Headless province → district → municipality → ward selector.
///
/// The host owns the address and hears about edits through the change
/// handler; the selector keeps a mirror so it can compute option lists. Each
/// edit produces exactly one patch that already contains every dependent
/// clear, so no intermediate state ever pairs a parent with a stale child.
pub struct HierarchicalAddressSelector {
    state: Arc<Mutex<SelectorState>>,
    on_change: ChangeHandler,
}

impl HierarchicalAddressSelector {
    pub fn new(selection: AddressSelection, on_change: ChangeHandler) -> Self {
        Self {
            state: Arc::new(Mutex::new(SelectorState {
                lookup: Arc::new(GeographicLookup::empty()),
                load_state: LoadState::Loading,
                selection,
            })),
            on_change,
        }
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        Self::lock_state(&self.state)
    }

    fn lock_state(state: &Mutex<SelectorState>) -> MutexGuard<'_, SelectorState> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start loading the lookup in the background. The task only holds a weak
    /// handle, so a result arriving after the selector is gone is dropped.
    pub fn mount(&self, source: Arc<dyn LookupSource>) -> JoinHandle<()> {
        let state = Arc::downgrade(&self.state);
        let on_change = self.on_change.clone();

        tokio::spawn(async move {
            let result = source.load().await.map(Arc::new);
            Self::deliver(&state, &on_change, result);
        })
    }

    /// Apply a load outcome directly, e.g. a lookup the host already cached.
    /// Only the first outcome counts; a failed load stays failed.
    pub fn apply_lookup(&self, result: Result<Arc<GeographicLookup>, LookupError>) {
        Self::deliver(&Arc::downgrade(&self.state), &self.on_change, result);
    }

    fn deliver(
        state: &Weak<Mutex<SelectorState>>,
        on_change: &ChangeHandler,
        result: Result<Arc<GeographicLookup>, LookupError>,
    ) {
        let Some(state) = state.upgrade() else {
            debug!("Address selector unmounted before lookup arrived; discarding");
            return;
        };

        let patch = {
            let mut guard = Self::lock_state(&state);
            if guard.load_state != LoadState::Loading {
                debug!("Address lookup already settled ({:?}); ignoring later load", guard.load_state);
                return;
            }
            match result {
                Ok(lookup) => {
                    guard.lookup = lookup;
                    guard.load_state = LoadState::Ready;
                    let patch = reconcile(&guard.selection, &guard.lookup);
                    patch.merge_into(&mut guard.selection);
                    patch
                }
                Err(e) => {
                    error!("Address lookup failed to load, selector disabled: {}", e);
                    guard.lookup = Arc::new(GeographicLookup::empty());
                    guard.load_state = LoadState::Failed;
                    AddressPatch::default()
                }
            }
        };

        if !patch.is_empty() {
            on_change(&patch);
        }
    }

    /// Tear down; any lookup still in flight is discarded on arrival
    pub fn unmount(self) {
        debug!("Address selector unmounted");
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().load_state
    }

    pub fn selection(&self) -> AddressSelection {
        self.lock().selection.clone()
    }

    /// The four controls in render order
    pub fn controls(&self) -> Vec<LevelControl> {
        let guard = self.lock();
        AddressLevel::ALL
            .into_iter()
            .map(|level| level_control(&guard.lookup, &guard.selection, level, guard.load_state))
            .collect()
    }

    pub fn control(&self, level: AddressLevel) -> LevelControl {
        let guard = self.lock();
        level_control(&guard.lookup, &guard.selection, level, guard.load_state)
    }

    /// User picked `value` at `level`. Emits one consolidated patch and
    /// returns it; `None` when the control is disabled, the value is not one
    /// of its options, or nothing changed.
    pub fn select(&self, level: AddressLevel, value: &str) -> Option<AddressPatch> {
        let patch = {
            let mut guard = self.lock();
            let control = level_control(&guard.lookup, &guard.selection, level, guard.load_state);
            if !control.is_enabled() {
                debug!("Ignoring selection on disabled {} control", level);
                return None;
            }

            if !is_offered(&guard.selection, &guard.lookup, level, value) {
                debug!("Ignoring '{}': not offered at {}", value, level);
                return None;
            }

            let patch = address_change_patch(&guard.selection, &guard.lookup, level, value);
            if patch.is_empty() {
                return None;
            }
            patch.merge_into(&mut guard.selection);
            patch
        };

        (self.on_change)(&patch);
        Some(patch)
    }

    /// Host pushed a new value. If it leaves a child that its parent no longer
    /// offers, one clearing patch is emitted. The patched selection is already
    /// consistent, so feeding it back in emits nothing.
    pub fn set_selection(&self, selection: AddressSelection) -> Option<AddressPatch> {
        let patch = {
            let mut guard = self.lock();
            guard.selection = selection;
            if guard.load_state != LoadState::Ready {
                return None;
            }
            let patch = reconcile(&guard.selection, &guard.lookup);
            if patch.is_empty() {
                return None;
            }
            patch.merge_into(&mut guard.selection);
            patch
        };

        (self.on_change)(&patch);
        Some(patch)
    }

    /// Ward as displayed, with Devanagari digits shown as ASCII
    pub fn ward_display(&self) -> String {
        display_ward(&self.lock().selection)
    }
}

//! Dependent selection cascade
//!
//! Department -> course -> year -> section. Each field's option list depends
//! on the selections above it. The cascade does no I/O: every mutation
//! returns the [`FetchRequest`]s the caller must issue, and results come back
//! through [`SelectionCascade::apply_options`].

/// One level of the cascade, in fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CascadeField {
    Department,
    Course,
    Year,
    Section,
}

impl CascadeField {
    pub const ALL: [CascadeField; 4] = [
        CascadeField::Department,
        CascadeField::Course,
        CascadeField::Year,
        CascadeField::Section,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            CascadeField::Department => "Department",
            CascadeField::Course => "Course",
            CascadeField::Year => "Year",
            CascadeField::Section => "Section",
        }
    }

    pub fn next(self) -> Option<CascadeField> {
        Self::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<CascadeField> {
        self.index().checked_sub(1).map(|i| Self::ALL[i])
    }
}

/// A selectable option. `value` is what gets stored; `label` is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeOption {
    pub value: String,
    pub label: String,
}

impl CascadeOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPhase {
    /// Nothing requested yet (or the last fetch failed)
    #[default]
    Idle,
    Loading,
    Loaded,
    /// Cleared because an upstream selection changed or emptied
    Invalidated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldState {
    pub options: Vec<CascadeOption>,
    /// Selected option values, in insertion order
    pub selected: Vec<String>,
    pub phase: FieldPhase,
    /// Key of the upstream selections the options were requested for
    pending_key: Option<String>,
}

impl FieldState {
    fn reset(&mut self, phase: FieldPhase) {
        self.options.clear();
        self.selected.clear();
        self.phase = phase;
        self.pending_key = None;
    }

    pub fn is_selected(&self, value: &str) -> bool {
        self.selected.iter().any(|v| v == value)
    }
}

/// Fetch the caller must perform for `field`, with the upstream selections it
/// depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub field: CascadeField,
    /// Selected departments (value = code, label = name)
    pub departments: Vec<CascadeOption>,
    pub courses: Vec<String>,
    pub years: Vec<String>,
}

impl FetchRequest {
    /// Identity of the upstream selections, used to detect stale results
    pub fn key(&self) -> String {
        let departments: Vec<&str> = self.departments.iter().map(|d| d.value.as_str()).collect();
        format!(
            "{:?}|{}|{}|{}",
            self.field,
            departments.join(","),
            self.courses.join(","),
            self.years.join(",")
        )
    }

    /// Query string for the year/section filter endpoints.
    ///
    /// Departments are filtered by name, and every value is its own repeated
    /// key.
    pub fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        for d in &self.departments {
            pairs.push(format!("department={}", urlencoding::encode(&d.label)));
        }
        for c in &self.courses {
            pairs.push(format!("course={}", urlencoding::encode(c)));
        }
        for y in &self.years {
            pairs.push(format!("year={}", urlencoding::encode(y)));
        }

        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }
}

/// State of the four dependent fields
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionCascade {
    fields: [FieldState; 4],
    multi: bool,
}

impl SelectionCascade {
    /// `multi` allows several values per field; otherwise selecting replaces
    pub fn new(multi: bool) -> Self {
        Self {
            fields: Default::default(),
            multi,
        }
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    /// Reset everything and request the root field
    pub fn start(&mut self) -> Vec<FetchRequest> {
        for field in self.fields.iter_mut() {
            field.reset(FieldPhase::Idle);
        }
        self.request(CascadeField::Department).into_iter().collect()
    }

    pub fn field(&self, field: CascadeField) -> &FieldState {
        &self.fields[field.index()]
    }

    pub fn options(&self, field: CascadeField) -> &[CascadeOption] {
        &self.fields[field.index()].options
    }

    pub fn selected(&self, field: CascadeField) -> &[String] {
        &self.fields[field.index()].selected
    }

    /// Selected options in selection order (values no longer offered are skipped)
    pub fn selected_options(&self, field: CascadeField) -> Vec<CascadeOption> {
        let state = &self.fields[field.index()];
        state
            .selected
            .iter()
            .filter_map(|v| state.options.iter().find(|o| &o.value == v).cloned())
            .collect()
    }

    /// Labels of the selected options, for display and submission
    pub fn selected_labels(&self, field: CascadeField) -> Vec<String> {
        self.selected_options(field)
            .into_iter()
            .map(|o| o.label)
            .collect()
    }

    /// Whether every field above `field` has at least one selection
    pub fn upstream_ready(&self, field: CascadeField) -> bool {
        self.fields[..field.index()]
            .iter()
            .all(|f| !f.selected.is_empty())
    }

    /// Toggle one option. In single-select mode this replaces the selection
    /// (or clears it when the same value is chosen again).
    pub fn toggle(&mut self, field: CascadeField, value: &str) -> Vec<FetchRequest> {
        let multi = self.multi;
        let state = &mut self.fields[field.index()];
        if !state.options.iter().any(|o| o.value == value) {
            return Vec::new();
        }

        if let Some(pos) = state.selected.iter().position(|v| v == value) {
            state.selected.remove(pos);
        } else if multi {
            state.selected.push(value.to_string());
        } else {
            state.selected = vec![value.to_string()];
        }

        self.on_changed(field)
    }

    /// Replace the selection wholesale. Unknown values are ignored.
    pub fn set_selection(&mut self, field: CascadeField, values: &[String]) -> Vec<FetchRequest> {
        let state = &mut self.fields[field.index()];
        let mut selected: Vec<String> = Vec::new();
        for value in values {
            if state.options.iter().any(|o| &o.value == value) && !selected.contains(value) {
                selected.push(value.clone());
            }
        }
        if !self.multi {
            selected.truncate(1);
        }

        if state.selected == selected {
            return Vec::new();
        }
        state.selected = selected;
        self.on_changed(field)
    }

    /// Select the full current option list (multi-select only)
    pub fn select_all(&mut self, field: CascadeField) -> Vec<FetchRequest> {
        if !self.multi {
            return Vec::new();
        }
        let all: Vec<String> = self.fields[field.index()]
            .options
            .iter()
            .map(|o| o.value.clone())
            .collect();
        self.set_selection(field, &all)
    }

    pub fn deselect_all(&mut self, field: CascadeField) -> Vec<FetchRequest> {
        self.set_selection(field, &[])
    }

    /// Install fetched options. Returns false when the result is stale.
    pub fn apply_options(&mut self, request: &FetchRequest, options: Vec<CascadeOption>) -> bool {
        let state = &mut self.fields[request.field.index()];
        if state.phase != FieldPhase::Loading
            || state.pending_key.as_deref() != Some(request.key().as_str())
        {
            return false;
        }
        state.options = options;
        state.selected.clear();
        state.phase = FieldPhase::Loaded;
        true
    }

    /// Re-request the first field whose last fetch failed. Empty when nothing
    /// is waiting on a retry.
    pub fn retry(&mut self) -> Vec<FetchRequest> {
        let failed = CascadeField::ALL.into_iter().find(|f| {
            self.fields[f.index()].phase == FieldPhase::Idle && self.upstream_ready(*f)
        });
        failed.and_then(|f| self.request(f)).into_iter().collect()
    }

    /// Record a failed fetch. Returns false when the request is stale.
    pub fn apply_failure(&mut self, request: &FetchRequest) -> bool {
        let state = &mut self.fields[request.field.index()];
        if state.phase != FieldPhase::Loading
            || state.pending_key.as_deref() != Some(request.key().as_str())
        {
            return false;
        }
        state.reset(FieldPhase::Idle);
        true
    }

    fn on_changed(&mut self, field: CascadeField) -> Vec<FetchRequest> {
        for downstream in &mut self.fields[field.index() + 1..] {
            downstream.reset(FieldPhase::Invalidated);
        }

        match field.next() {
            Some(next) if self.upstream_ready(next) => self.request(next).into_iter().collect(),
            _ => Vec::new(),
        }
    }

    fn request(&mut self, field: CascadeField) -> Option<FetchRequest> {
        if !self.upstream_ready(field) {
            return None;
        }

        let upstream_values = |f: CascadeField| -> Vec<String> {
            if f < field {
                self.fields[f.index()].selected.clone()
            } else {
                Vec::new()
            }
        };
        let departments = if field > CascadeField::Department {
            self.selected_options(CascadeField::Department)
        } else {
            Vec::new()
        };

        let request = FetchRequest {
            field,
            departments,
            courses: upstream_values(CascadeField::Course),
            years: upstream_values(CascadeField::Year),
        };

        let state = &mut self.fields[field.index()];
        state.phase = FieldPhase::Loading;
        state.pending_key = Some(request.key());
        Some(request)
    }
}

use super::{Point, WindowId, WindowSeed};
use crate::apps::{AppId, SizeTable};
use crate::constants::{CASCADE_ORIGIN_X, CASCADE_ORIGIN_Y, CASCADE_STEP};

type TitleResolver = Box<dyn Fn(AppId) -> String>;

/// Manager-owned identity, order and stacking entry for one open window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRecord {
    id: WindowId,
    app: AppId,
    title: String,
    minimized: bool,
    z_index: u64,
    seed: WindowSeed,
}

impl WindowRecord {
    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn app(&self) -> AppId {
        self.app
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn z_index(&self) -> u64 {
        self.z_index
    }

    /// Geometry the window was created with. Live geometry belongs to the
    /// window instance and is never written back here.
    pub fn seed(&self) -> WindowSeed {
        self.seed
    }
}

/// Desktop session state: the open windows, which one is active, and the
/// stacking counter.
///
/// Every operation is total. Ids that do not match a record are ignored
/// without logging, since an interaction may legitimately still hold the id
/// of a window that was closed a moment earlier.
pub struct WindowManager {
    // insertion order; stacking order is derived from `z_index`
    windows: Vec<WindowRecord>,
    active: Option<WindowId>,
    z_counter: u64,
    next_id: u64,
    sizes: SizeTable,
    cascade_origin: Point,
    cascade_step: i32,
    titles: TitleResolver,
}

impl Default for WindowManager {
    fn default() -> Self {
        Self::new(SizeTable::default())
    }
}

impl std::fmt::Debug for WindowManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowManager")
            .field("windows", &self.windows)
            .field("active", &self.active)
            .field("z_counter", &self.z_counter)
            .finish_non_exhaustive()
    }
}

impl WindowManager {
    pub fn new(sizes: SizeTable) -> Self {
        Self {
            windows: Vec::new(),
            active: None,
            z_counter: 0,
            next_id: 1,
            sizes,
            cascade_origin: Point::new(CASCADE_ORIGIN_X, CASCADE_ORIGIN_Y),
            cascade_step: CASCADE_STEP,
            titles: Box::new(|app| app.to_string()),
        }
    }

    /// Use `resolver` for the titles of windows opened from now on.
    /// Existing titles are left alone; see [`Self::rename_all`].
    pub fn with_title_resolver(mut self, resolver: impl Fn(AppId) -> String + 'static) -> Self {
        self.titles = Box::new(resolver);
        self
    }

    /// Open a window for `app`, or focus the existing one.
    ///
    /// At most one window exists per application. A new window is placed
    /// on a diagonal cascade so successive windows do not cover each other
    /// exactly, gets a z-index above every other window and becomes active.
    pub fn open(&mut self, app: AppId) -> WindowId {
        if let Some(existing) = self.find_by_app(app) {
            let id = existing.id;
            self.focus(id);
            return id;
        }

        let id = WindowId::new(self.next_id);
        self.next_id += 1;
        let cascade = self.cascade_step.saturating_mul(self.windows.len() as i32);
        let position = self.cascade_origin + Point::new(cascade, cascade);
        let size = self.sizes.lookup(app);
        let z_index = self.next_z();
        tracing::debug!(window_id = %id, ?app, z_index, "opened window");
        self.windows.push(WindowRecord {
            id,
            app,
            title: (self.titles)(app),
            minimized: false,
            z_index,
            seed: WindowSeed { position, size },
        });
        self.active = Some(id);
        id
    }

    /// Remove the window entirely. The active pointer is cleared when the
    /// closed window was active; no other window is focused in its place.
    pub fn close(&mut self, id: WindowId) {
        let Some(index) = self.index_of(id) else {
            return;
        };
        let record = self.windows.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        tracing::debug!(window_id = %id, app = ?record.app, "closed window");
    }

    pub fn minimize(&mut self, id: WindowId) {
        let Some(record) = self.record_mut(id) else {
            return;
        };
        if record.minimized {
            return;
        }
        record.minimized = true;
        if self.active == Some(id) {
            self.active = None;
        }
        tracing::debug!(window_id = %id, "minimized window");
    }

    /// Raise the window to the top of the stack and make it active,
    /// restoring it first when it is minimized.
    pub fn focus(&mut self, id: WindowId) {
        if self.index_of(id).is_none() {
            return;
        }
        let z_index = self.next_z();
        let Some(record) = self.record_mut(id) else {
            return;
        };
        let restored = std::mem::replace(&mut record.minimized, false);
        record.z_index = z_index;
        self.active = Some(id);
        tracing::debug!(window_id = %id, z_index, restored, "focused window");
    }

    /// Recompute every title from its application id. Order, z-index and
    /// geometry are untouched. The resolver is kept for windows opened
    /// later.
    pub fn rename_all(&mut self, resolver: impl Fn(AppId) -> String + 'static) {
        for record in &mut self.windows {
            record.title = resolver(record.app);
        }
        self.titles = Box::new(resolver);
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn record(&self, id: WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|record| record.id == id)
    }

    pub fn find_by_app(&self, app: AppId) -> Option<&WindowRecord> {
        self.windows.iter().find(|record| record.app == app)
    }

    pub fn active(&self) -> Option<WindowId> {
        self.active
    }

    pub fn is_active(&self, id: WindowId) -> bool {
        self.active == Some(id)
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Highest z-index handed out so far.
    pub fn top_z(&self) -> u64 {
        self.z_counter
    }

    /// Windows eligible for drawing, bottom-most first.
    pub fn draw_order(&self) -> Vec<&WindowRecord> {
        let mut visible: Vec<&WindowRecord> =
            self.windows.iter().filter(|record| !record.minimized).collect();
        visible.sort_by_key(|record| record.z_index);
        visible
    }

    /// Every window in insertion order, paired with whether it is active.
    /// Minimized windows are included.
    pub fn taskbar(&self) -> impl Iterator<Item = (&WindowRecord, bool)> + '_ {
        self.windows
            .iter()
            .map(move |record| (record, self.active == Some(record.id)))
    }

    /// The window after the active one in taskbar order, wrapping around.
    /// With no active window the first record is returned.
    pub fn next_in_taskbar(&self) -> Option<WindowId> {
        if self.windows.is_empty() {
            return None;
        }
        let next = match self.active.and_then(|id| self.index_of(id)) {
            Some(index) => (index + 1) % self.windows.len(),
            None => 0,
        };
        Some(self.windows[next].id)
    }

    fn next_z(&mut self) -> u64 {
        self.z_counter += 1;
        self.z_counter
    }

    fn index_of(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|record| record.id == id)
    }

    fn record_mut(&mut self, id: WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|record| record.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::Size;

    fn assert_invariants(wm: &WindowManager) {
        let mut z: Vec<u64> = wm.records().iter().map(|r| r.z_index()).collect();
        z.sort_unstable();
        z.dedup();
        assert_eq!(z.len(), wm.len(), "z-index values must be unique");
        if let Some(active) = wm.active() {
            let record = wm.record(active).expect("active window must exist");
            assert!(!record.is_minimized(), "active window must not be minimized");
        }
        for app in AppId::ALL {
            assert!(wm.records().iter().filter(|r| r.app() == app).count() <= 1);
        }
    }

    #[test]
    fn open_assigns_increasing_z_and_activates() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        let c = wm.open(AppId::Personnel);
        let z: Vec<u64> = [a, b, c]
            .iter()
            .map(|id| wm.record(*id).unwrap().z_index())
            .collect();
        assert_eq!(z, vec![1, 2, 3]);
        assert_eq!(wm.active(), Some(c));
        assert_invariants(&wm);
    }

    #[test]
    fn open_cascades_from_origin() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        let seed_a = wm.record(a).unwrap().seed();
        let seed_b = wm.record(b).unwrap().seed();
        assert_eq!(seed_a.position, Point::new(300, 100));
        assert_eq!(seed_b.position, Point::new(340, 140));
        assert_eq!(seed_a.size, Size::new(900, 700));
        assert_eq!(seed_b.size, Size::new(800, 600));
    }

    #[test]
    fn reopen_focuses_existing_record() {
        let mut wm = WindowManager::default();
        let first = wm.open(AppId::Terminal);
        let seed = wm.record(first).unwrap().seed();
        let second = wm.open(AppId::Terminal);
        assert_eq!(first, second);
        assert_eq!(wm.len(), 1);
        let record = wm.record(first).unwrap();
        assert_eq!(record.z_index(), 2);
        assert_eq!(record.seed(), seed);
    }

    #[test]
    fn minimize_only_clears_active_for_active_window() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        wm.minimize(a);
        assert_eq!(wm.active(), Some(b));
        wm.minimize(b);
        assert_eq!(wm.active(), None);
        assert_invariants(&wm);
    }

    #[test]
    fn minimize_twice_is_a_no_op() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        wm.minimize(a);
        let before = wm.record(a).cloned();
        wm.minimize(a);
        assert_eq!(wm.record(a).cloned(), before);
    }

    #[test]
    fn focus_restores_and_raises_minimized_window() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let _b = wm.open(AppId::Files);
        wm.minimize(a);
        wm.focus(a);
        let record = wm.record(a).unwrap();
        assert!(!record.is_minimized());
        assert_eq!(record.z_index(), wm.top_z());
        assert_eq!(wm.active(), Some(a));
        assert_invariants(&wm);
    }

    #[test]
    fn close_does_not_refocus() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        wm.close(b);
        assert_eq!(wm.len(), 1);
        assert_eq!(wm.active(), None);
        assert!(wm.record(a).is_some());
    }

    #[test]
    fn unknown_ids_are_ignored() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        wm.close(a);
        let snapshot = (wm.len(), wm.active(), wm.top_z());
        wm.close(a);
        wm.minimize(a);
        wm.focus(a);
        assert_eq!((wm.len(), wm.active(), wm.top_z()), snapshot);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        wm.close(a);
        let b = wm.open(AppId::Magi);
        assert_ne!(a, b);
    }

    #[test]
    fn rename_all_keeps_order_and_z() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        let z_before: Vec<u64> = wm.records().iter().map(|r| r.z_index()).collect();
        wm.rename_all(|app| format!("renamed {app}"));
        let ids: Vec<WindowId> = wm.records().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![a, b]);
        let z_after: Vec<u64> = wm.records().iter().map(|r| r.z_index()).collect();
        assert_eq!(z_before, z_after);
        assert_eq!(wm.record(a).unwrap().title(), "renamed MAGI");
        let c = wm.open(AppId::Terminal);
        assert_eq!(wm.record(c).unwrap().title(), "renamed TERMINAL");
    }

    #[test]
    fn draw_order_skips_minimized_and_sorts_by_z() {
        let mut wm = WindowManager::default();
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        let c = wm.open(AppId::Personnel);
        wm.focus(a);
        wm.minimize(b);
        let order: Vec<WindowId> = wm.draw_order().iter().map(|r| r.id()).collect();
        assert_eq!(order, vec![c, a]);
        let taskbar: Vec<(WindowId, bool)> =
            wm.taskbar().map(|(r, active)| (r.id(), active)).collect();
        assert_eq!(taskbar, vec![(a, true), (b, false), (c, false)]);
    }

    #[test]
    fn next_in_taskbar_wraps() {
        let mut wm = WindowManager::default();
        assert_eq!(wm.next_in_taskbar(), None);
        let a = wm.open(AppId::Magi);
        let b = wm.open(AppId::Files);
        assert_eq!(wm.next_in_taskbar(), Some(a));
        wm.focus(a);
        assert_eq!(wm.next_in_taskbar(), Some(b));
        wm.minimize(a);
        assert_eq!(wm.next_in_taskbar(), Some(a));
    }
}

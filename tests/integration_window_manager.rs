use magi_wm::apps::{AppId, SizeTable};
use magi_wm::locale::Locale;
use magi_wm::window::{Size, WindowManager};

fn z_order(wm: &WindowManager) -> Vec<AppId> {
    wm.draw_order().iter().map(|r| r.app()).collect()
}

#[test]
fn focus_raises_to_top_of_three() {
    let mut wm = WindowManager::default();
    let a = wm.open(AppId::Magi);
    wm.open(AppId::Files);
    wm.open(AppId::Personnel);
    wm.focus(a);
    assert_eq!(
        z_order(&wm),
        vec![AppId::Files, AppId::Personnel, AppId::Magi]
    );
    assert_eq!(wm.active(), Some(a));
    let top = wm.records().iter().map(|r| r.z_index()).max();
    assert_eq!(wm.record(a).map(|r| r.z_index()), top);
}

#[test]
fn minimize_then_focus_restores() {
    let mut wm = WindowManager::default();
    let a = wm.open(AppId::Magi);
    let b = wm.open(AppId::Terminal);
    wm.minimize(b);
    assert_eq!(wm.active(), None);
    assert_eq!(z_order(&wm), vec![AppId::Magi]);

    wm.focus(b);
    assert_eq!(wm.active(), Some(b));
    assert!(!wm.record(b).is_some_and(|r| r.is_minimized()));
    assert_eq!(z_order(&wm), vec![AppId::Magi, AppId::Terminal]);
    assert!(wm.record(a).is_some());
}

#[test]
fn taskbar_lists_minimized_windows_in_insertion_order() {
    let mut wm = WindowManager::default();
    let a = wm.open(AppId::Magi);
    let b = wm.open(AppId::Files);
    wm.minimize(a);
    wm.focus(a);
    wm.minimize(b);
    let entries: Vec<(AppId, bool, bool)> = wm
        .taskbar()
        .map(|(r, active)| (r.app(), active, r.is_minimized()))
        .collect();
    assert_eq!(
        entries,
        vec![(AppId::Magi, true, false), (AppId::Files, false, true)]
    );
}

#[test]
fn close_changes_count_only_for_known_ids() {
    let mut wm = WindowManager::default();
    let a = wm.open(AppId::Magi);
    let b = wm.open(AppId::Files);
    wm.close(a);
    assert_eq!(wm.len(), 1);
    wm.close(a);
    assert_eq!(wm.len(), 1);
    assert_eq!(wm.active(), Some(b));
    wm.close(b);
    assert!(wm.is_empty());
    assert_eq!(wm.active(), None);
}

#[test]
fn reopening_after_close_uses_seed_geometry() {
    let mut wm = WindowManager::default();
    let first = wm.open(AppId::Personnel);
    let seed = wm.record(first).map(|r| r.seed());
    wm.close(first);
    let second = wm.open(AppId::Personnel);
    assert_ne!(first, second);
    assert_eq!(wm.record(second).map(|r| r.seed()), seed);
}

#[test]
fn unlisted_applications_fall_back_to_default_size() {
    let mut wm = WindowManager::new(SizeTable::empty());
    for app in [AppId::Magi, AppId::Files, AppId::Terminal, AppId::Settings] {
        let id = wm.open(app);
        assert_eq!(
            wm.record(id).map(|r| r.seed().size),
            Some(Size::new(800, 600))
        );
    }
}

#[test]
fn rename_all_follows_locale() {
    let mut wm = WindowManager::new(SizeTable::default())
        .with_title_resolver(|app| Locale::Cn.app_title(app));
    let id = wm.open(AppId::Files);
    assert_eq!(wm.record(id).map(|r| r.title()), Some("数据档案"));
    wm.rename_all(|app| Locale::En.app_title(app));
    assert_eq!(wm.record(id).map(|r| r.title()), Some("ARCHIVES"));
    let term = wm.open(AppId::Terminal);
    assert_eq!(wm.record(term).map(|r| r.title()), Some("TERMINAL"));
}

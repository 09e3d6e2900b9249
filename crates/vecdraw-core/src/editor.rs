//! The editor driver: owns the document, runs the active tool and applies
//! the effects it emits.

use crate::algorithms::{IntersectionFinder, LineIntersectionFinder};
use crate::connect::{connect_point, disconnect_shape};
use crate::error::{EditorError, EditorResult};
use crate::filters::FilterChain;
use crate::hittest;
use crate::input::{InputArgs, ToolEvent};
use crate::render::ShapeRenderer;
use crate::scene::{LayerKind, Scene};
use crate::selection::SelectionSurface;
use crate::settings::EditorSettings;
use crate::shapes::{ShapeId, ShapeStyle};
use crate::tools::{
    BoxTool, CubicBezierTool, Effect, LineTool, NoneTool, PathSubTool, PathTool, PointTool, QuadraticBezierTool,
    ScribbleTool, SelectionTool, Tool, ToolContext, ToolKind,
};
use std::sync::Arc;

/// Host-side hooks a gesture drives.
pub trait ToolHost {
    /// Route every pointer event to the canvas until released.
    fn capture(&mut self);
    fn release(&mut self);
    /// Request a redraw.
    fn invalidate(&mut self);
}

/// Host without a window. Records what the tools asked for.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    capture_depth: usize,
    invalidations: usize,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capture_depth(&self) -> usize {
        self.capture_depth
    }

    pub fn is_captured(&self) -> bool {
        self.capture_depth > 0
    }

    /// Redraw requests so far.
    pub fn invalidations(&self) -> usize {
        self.invalidations
    }
}

impl ToolHost for HeadlessHost {
    fn capture(&mut self) {
        self.capture_depth += 1;
    }

    fn release(&mut self) {
        self.capture_depth = self.capture_depth.saturating_sub(1);
    }

    fn invalidate(&mut self) {
        self.invalidations += 1;
    }
}

/// One instance of every tool.
#[derive(Debug)]
struct Toolbox {
    none: NoneTool,
    selection: SelectionTool,
    point: PointTool,
    line: LineTool,
    cubic: CubicBezierTool,
    quadratic: QuadraticBezierTool,
    rectangle: BoxTool,
    ellipse: BoxTool,
    text: BoxTool,
    path: PathTool,
    scribble: ScribbleTool,
}

impl Toolbox {
    fn new() -> Self {
        Self {
            none: NoneTool,
            selection: SelectionTool::new(),
            point: PointTool::new(),
            line: LineTool::new(),
            cubic: CubicBezierTool::new(),
            quadratic: QuadraticBezierTool::new(),
            rectangle: BoxTool::rectangle(),
            ellipse: BoxTool::ellipse(),
            text: BoxTool::text(),
            path: PathTool::new(),
            scribble: ScribbleTool::new(),
        }
    }

    fn get(&self, kind: ToolKind) -> &dyn Tool {
        match kind {
            ToolKind::None => &self.none,
            ToolKind::Selection => &self.selection,
            ToolKind::Point => &self.point,
            ToolKind::Line => &self.line,
            ToolKind::CubicBezier => &self.cubic,
            ToolKind::QuadraticBezier => &self.quadratic,
            ToolKind::Rectangle => &self.rectangle,
            ToolKind::Ellipse => &self.ellipse,
            ToolKind::Text => &self.text,
            ToolKind::Path => &self.path,
            ToolKind::Scribble => &self.scribble,
        }
    }

    fn get_mut(&mut self, kind: ToolKind) -> &mut dyn Tool {
        match kind {
            ToolKind::None => &mut self.none,
            ToolKind::Selection => &mut self.selection,
            ToolKind::Point => &mut self.point,
            ToolKind::Line => &mut self.line,
            ToolKind::CubicBezier => &mut self.cubic,
            ToolKind::QuadraticBezier => &mut self.quadratic,
            ToolKind::Rectangle => &mut self.rectangle,
            ToolKind::Ellipse => &mut self.ellipse,
            ToolKind::Text => &mut self.text,
            ToolKind::Path => &mut self.path,
            ToolKind::Scribble => &mut self.scribble,
        }
    }
}

/// An editing session over one scene.
pub struct Editor<H: ToolHost = HeadlessHost> {
    scene: Scene,
    selection: SelectionSurface,
    settings: EditorSettings,
    filters: FilterChain,
    finders: Vec<Box<dyn IntersectionFinder>>,
    /// Detached deep copies, roots in paste order.
    clipboard: Scene,
    clipboard_roots: Vec<ShapeId>,
    tools: Toolbox,
    tool: ToolKind,
    style: Option<Arc<ShapeStyle>>,
    point_template: Option<ShapeId>,
    host: H,
}

impl Editor<HeadlessHost> {
    /// Editor without a window.
    pub fn headless(settings: EditorSettings) -> Self {
        Self::new(settings, HeadlessHost::new())
    }
}

impl<H: ToolHost> Editor<H> {
    pub fn new(settings: EditorSettings, host: H) -> Self {
        Self {
            scene: Scene::new(),
            selection: SelectionSurface::new(),
            filters: FilterChain::from_settings(&settings),
            settings,
            finders: vec![Box::new(LineIntersectionFinder::new())],
            clipboard: Scene::new(),
            clipboard_roots: Vec::new(),
            tools: Toolbox::new(),
            tool: ToolKind::default(),
            style: Some(Arc::new(ShapeStyle::default())),
            point_template: None,
            host,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn selection(&self) -> &SelectionSurface {
        &self.selection
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Replace the settings. Filters are rebuilt; a gesture in progress is
    /// aborted first.
    pub fn set_settings(&mut self, settings: EditorSettings) {
        self.clean_tool();
        self.filters = FilterChain::from_settings(&settings);
        self.settings = settings;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Whether the active tool has no gesture in progress.
    pub fn is_idle(&self) -> bool {
        self.tools.get(self.tool).is_idle()
    }

    /// Style given to shapes created from now on.
    pub fn set_style(&mut self, style: Option<Arc<ShapeStyle>>) {
        self.style = style;
    }

    pub fn set_point_template(&mut self, template: Option<ShapeId>) {
        self.point_template = template;
    }

    /// Register an additional intersection finder for the line tool.
    pub fn add_intersection_finder(&mut self, finder: Box<dyn IntersectionFinder>) {
        self.finders.push(finder);
    }

    // ---- tool dispatch -----------------------------------------------------

    /// Switch tools. The previous tool's gesture is aborted.
    pub fn set_tool(&mut self, kind: ToolKind) {
        if kind == self.tool {
            return;
        }
        self.clean_tool();
        log::debug!("tool {} -> {}", self.tool.name(), kind.name());
        self.tool = kind;
    }

    /// Abort the active tool's gesture, if any.
    pub fn clean_tool(&mut self) {
        let kind = self.tool;
        self.with_context(|tools, ctx| tools.get_mut(kind).clean(ctx));
    }

    pub fn handle_event(&mut self, event: ToolEvent) {
        let kind = self.tool;
        self.with_context(|tools, ctx| tools.get_mut(kind).handle(event, ctx));
    }

    pub fn left_down(&mut self, args: InputArgs) {
        self.handle_event(ToolEvent::LeftDown(args));
    }

    pub fn left_up(&mut self, args: InputArgs) {
        self.handle_event(ToolEvent::LeftUp(args));
    }

    pub fn right_down(&mut self, args: InputArgs) {
        self.handle_event(ToolEvent::RightDown(args));
    }

    pub fn right_up(&mut self, args: InputArgs) {
        self.handle_event(ToolEvent::RightUp(args));
    }

    pub fn pointer_move(&mut self, args: InputArgs) {
        self.handle_event(ToolEvent::Move(args));
    }

    /// Switch the path tool's segment kind.
    pub fn set_path_sub_tool(&mut self, sub: PathSubTool) {
        self.with_context(|tools, ctx| tools.path.set_sub_tool(sub, ctx));
    }

    pub fn path_sub_tool(&self) -> PathSubTool {
        self.tools.path.sub_tool()
    }

    fn with_context<R>(&mut self, f: impl FnOnce(&mut Toolbox, &mut ToolContext) -> R) -> R {
        let mut ctx = ToolContext::new(
            &mut self.scene,
            &self.selection,
            &self.settings,
            &mut self.filters,
            &mut self.finders,
        )
        .with_style(self.style.clone())
        .with_point_template(self.point_template);
        let result = f(&mut self.tools, &mut ctx);
        let effects = ctx.into_effects();
        self.apply(effects);
        result
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut discarded = false;
        for effect in effects {
            match effect {
                Effect::AddWorking(id) => {
                    self.scene.layer_mut(LayerKind::Working).add(id);
                }
                Effect::RemoveWorking(id) => {
                    self.scene.layer_mut(LayerKind::Working).remove(id);
                }
                Effect::AddCurrent(id) => {
                    self.scene.layer_mut(LayerKind::Current).add(id);
                }
                Effect::InsertCurrent { index, shape } => {
                    self.scene.layer_mut(LayerKind::Current).insert(index, shape);
                }
                Effect::RemoveCurrent(id) => {
                    self.scene.layer_mut(LayerKind::Current).remove(id);
                }
                Effect::Commit(id) => {
                    self.scene.commit(id);
                }
                Effect::Discard(id) => {
                    discarded |= self.scene.delete(id);
                }
                Effect::Capture => self.host.capture(),
                Effect::Release => self.host.release(),
                Effect::Invalidate => self.host.invalidate(),
            }
        }
        if discarded {
            self.prune_selection();
        }
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.lock().retain(|id| scene.contains(id));
    }

    // ---- drawing -----------------------------------------------------------

    /// Draw the document, then the gesture preview on top.
    pub fn draw(&self, renderer: &mut dyn ShapeRenderer) {
        let selection = self.selection.snapshot();
        self.scene.draw_layer(LayerKind::Current, renderer, selection.selected());
        self.scene.draw_layer(LayerKind::Working, renderer, selection.selected());
    }

    // ---- history -----------------------------------------------------------

    pub fn undo(&mut self) -> bool {
        self.clean_tool();
        let changed = self.scene.undo();
        if changed {
            self.prune_selection();
            self.host.invalidate();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        self.clean_tool();
        let changed = self.scene.redo();
        if changed {
            self.prune_selection();
            self.host.invalidate();
        }
        changed
    }

    // ---- selection commands ------------------------------------------------

    /// Select one shape by handle.
    pub fn select(&mut self, id: ShapeId) -> EditorResult<()> {
        if !self.scene.contains(id) {
            return Err(EditorError::UnknownShape);
        }
        self.selection.lock().select(id);
        self.host.invalidate();
        Ok(())
    }

    pub fn select_all(&mut self) {
        let shapes = self.scene.current().shapes().to_vec();
        self.selection.lock().set(shapes);
        self.host.invalidate();
    }

    pub fn deselect_all(&mut self) {
        self.selection.lock().clear();
        self.host.invalidate();
    }

    /// Selected shapes on the current layer, back to front.
    pub fn selected_shapes(&self) -> Vec<ShapeId> {
        let selection = self.selection.lock();
        self.scene
            .current()
            .shapes()
            .iter()
            .copied()
            .filter(|&id| selection.is_selected(id))
            .collect()
    }

    /// Delete the selected layer shapes. Selected points owned by other
    /// shapes are left alone. Returns how many shapes were removed.
    pub fn delete_selected(&mut self) -> usize {
        self.clean_tool();
        let targets = self.selected_shapes();
        if targets.is_empty() {
            return 0;
        }
        self.scene.push_undo();
        for &id in &targets {
            self.scene.delete(id);
        }
        self.selection.lock().clear();
        self.prune_selection();
        log::info!("deleted {} shape(s)", targets.len());
        self.host.invalidate();
        targets.len()
    }

    /// Group the selected layer shapes. The group takes the place of the
    /// frontmost member. Needs at least two shapes.
    pub fn group_selected(&mut self) -> Option<ShapeId> {
        self.clean_tool();
        let members = self.selected_shapes();
        if members.len() < 2 {
            return None;
        }
        let front = members
            .iter()
            .filter_map(|&id| self.scene.current().position(id))
            .max()?;

        self.scene.push_undo();
        let layer = self.scene.layer_mut(LayerKind::Current);
        for &id in &members {
            layer.remove(id);
        }
        let group = self.scene.create_group(members.clone());
        let index = (front + 1).saturating_sub(members.len());
        self.scene.layer_mut(LayerKind::Current).insert(index, group);

        self.selection.lock().select(group);
        log::info!("grouped {} shapes", members.len());
        self.host.invalidate();
        Some(group)
    }

    /// Dissolve every selected group in place. Returns the released children,
    /// which become the selection.
    pub fn ungroup_selected(&mut self) -> Vec<ShapeId> {
        self.clean_tool();
        let groups: Vec<ShapeId> = self
            .selected_shapes()
            .into_iter()
            .filter(|&id| self.scene.get(id).is_some_and(|s| s.kind.is_group()))
            .collect();
        if groups.is_empty() {
            return Vec::new();
        }

        self.scene.push_undo();
        let mut released = Vec::new();
        for group in groups {
            let Some(index) = self.scene.layer_mut(LayerKind::Current).remove(group) else {
                continue;
            };
            let Some(children) = self.scene.dissolve_group(group) else {
                continue;
            };
            let layer = self.scene.layer_mut(LayerKind::Current);
            for (offset, &child) in children.iter().enumerate() {
                layer.insert(index + offset, child);
            }
            log::info!("ungrouped {} shapes", children.len());
            released.extend(children);
        }
        self.selection.lock().set(released.iter().copied());
        self.host.invalidate();
        released
    }

    // ---- clipboard ---------------------------------------------------------

    /// Copy the selected layer shapes. Returns how many were copied.
    pub fn copy(&mut self) -> usize {
        let roots = self.selected_shapes();
        if roots.is_empty() {
            return 0;
        }
        let mut clipboard = Scene::new();
        self.clipboard_roots = clipboard.import(&self.scene, &roots);
        self.clipboard = clipboard;
        log::debug!("copied {} shape(s)", roots.len());
        roots.len()
    }

    pub fn cut(&mut self) -> usize {
        let copied = self.copy();
        if copied > 0 {
            self.delete_selected();
        }
        copied
    }

    /// Paste a fresh copy of the clipboard on top of the current layer and
    /// select it.
    pub fn paste(&mut self) -> EditorResult<Vec<ShapeId>> {
        if self.clipboard_roots.is_empty() {
            return Err(EditorError::EmptyClipboard);
        }
        self.clean_tool();
        self.scene.push_undo();
        let pasted = self.scene.import(&self.clipboard, &self.clipboard_roots);
        let layer = self.scene.layer_mut(LayerKind::Current);
        for &id in &pasted {
            layer.add(id);
        }
        self.selection.lock().set(pasted.iter().copied());
        log::info!("pasted {} shape(s)", pasted.len());
        self.host.invalidate();
        Ok(pasted)
    }

    // ---- connectivity ------------------------------------------------------

    /// Connect every selected point to the nearest foreign point within the
    /// connection radius. Returns how many connections were made.
    pub fn connect_selected(&mut self) -> usize {
        self.clean_tool();
        let points: Vec<ShapeId> = {
            let selection = self.selection.lock();
            selection
                .selected()
                .iter()
                .copied()
                .filter(|&id| self.scene.get(id).is_some_and(|s| s.kind.is_point()))
                .collect()
        };

        let mut connected = 0;
        for point in points {
            let Some(at) = self.scene.position(point) else {
                continue;
            };
            let mut exclude = vec![point];
            for owner in self.scene.owners_of(point) {
                exclude.extend(self.scene.points(owner));
            }
            let target = hittest::try_get_point(
                &self.scene,
                self.scene.current().shapes(),
                at,
                self.settings.connection_radius,
                &exclude,
            );
            let Some(target) = target else {
                continue;
            };
            if connected == 0 {
                self.scene.push_undo();
            }
            let target_position = self.scene.position(target);
            let Some(connection) = connect_point(&mut self.scene, point, target) else {
                continue;
            };
            if let Some(p) = target_position {
                self.scene.set_position(point, p);
            }
            if connection.was_standalone {
                self.scene.layer_mut(LayerKind::Current).remove(point);
            }
            connected += 1;
        }
        if connected > 0 {
            self.prune_selection();
            self.host.invalidate();
        }
        connected
    }

    /// Give every selected shape private copies of the points it shares.
    /// Returns the created copies.
    pub fn disconnect_selected(&mut self) -> Vec<ShapeId> {
        self.clean_tool();
        let targets = self.selected_shapes();
        let shared = targets.iter().any(|&id| {
            self.scene
                .points(id)
                .iter()
                .any(|&p| self.scene.owners_of(p).len() > 1)
        });
        if !shared {
            return Vec::new();
        }
        self.scene.push_undo();
        let copies: Vec<ShapeId> = targets
            .into_iter()
            .flat_map(|id| disconnect_shape(&mut self.scene, id))
            .collect();
        self.host.invalidate();
        copies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::render::RecordingRenderer;
    use crate::shapes::ShapeKind;
    use kurbo::Point;

    fn editor() -> Editor {
        Editor::headless(EditorSettings::default())
    }

    fn click(editor: &mut Editor, x: f64, y: f64) {
        editor.left_down(InputArgs::new(x, y));
        editor.left_up(InputArgs::new(x, y));
    }

    fn line(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) {
        editor.set_tool(ToolKind::Line);
        click(editor, from.0, from.1);
        editor.pointer_move(InputArgs::new(to.0, to.1));
        click(editor, to.0, to.1);
    }

    fn endpoints(editor: &Editor, id: ShapeId) -> (ShapeId, ShapeId) {
        let l = editor.scene().get(id).unwrap().kind.as_line().unwrap();
        (l.start, l.end)
    }

    #[test]
    fn test_two_click_line() {
        let mut e = editor();
        e.set_tool(ToolKind::Line);
        e.left_down(InputArgs::new(0.0, 0.0));
        e.left_down(InputArgs::new(10.0, 0.0));

        let shapes = e.scene().current().shapes().to_vec();
        assert_eq!(shapes.len(), 1);
        let (start, end) = endpoints(&e, shapes[0]);
        assert_eq!(e.scene().position(start), Some(Point::new(0.0, 0.0)));
        assert_eq!(e.scene().position(end), Some(Point::new(10.0, 0.0)));
        assert!(e.scene().working().is_empty());
        assert!(!e.host().is_captured());
    }

    #[test]
    fn test_abort_leaves_layer_unchanged_for_every_tool() {
        for kind in ToolKind::ALL {
            if matches!(kind, ToolKind::None | ToolKind::Point) {
                continue;
            }
            let mut e = editor();
            line(&mut e, (0.0, 200.0), (100.0, 200.0));
            let before = e.scene().current().shapes().to_vec();
            let arena = e.scene().arena_len();

            e.set_tool(kind);
            e.left_down(InputArgs::new(300.0, 300.0));
            e.pointer_move(InputArgs::new(350.0, 340.0));
            e.right_down(InputArgs::new(350.0, 340.0));

            assert_eq!(e.scene().current().shapes(), &before[..], "{}", kind.name());
            assert!(e.scene().working().is_empty(), "{}", kind.name());
            assert_eq!(e.scene().arena_len(), arena, "{}", kind.name());
            assert_eq!(e.host().capture_depth(), 0, "{}", kind.name());
        }
    }

    #[test]
    fn test_switching_tool_cleans_gesture() {
        let mut e = editor();
        e.set_tool(ToolKind::Path);
        e.left_down(InputArgs::new(0.0, 0.0));
        e.left_down(InputArgs::new(100.0, 0.0));
        e.left_down(InputArgs::new(100.0, 100.0));
        assert!(!e.is_idle());

        e.set_tool(ToolKind::Selection);
        assert!(e.scene().current().is_empty());
        assert!(e.scene().working().is_empty());
        assert_eq!(e.scene().arena_len(), 0);
        assert_eq!(e.host().capture_depth(), 0);
    }

    #[test]
    fn test_intersection_split_through_editor() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 100.0));
        line(&mut e, (0.0, 100.0), (100.0, 0.0));

        let shapes = e.scene().current().shapes().to_vec();
        assert_eq!(shapes.len(), 4);
        let hub = shapes
            .iter()
            .flat_map(|&id| [endpoints(&e, id).0, endpoints(&e, id).1])
            .find(|&p| e.scene().owners_of(p).len() == 4)
            .unwrap();
        let at = e.scene().position(hub).unwrap();
        assert!((at.x - 50.0).abs() < 1e-9 && (at.y - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_undo_drops_connection_of_undone_line() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        let first = e.scene().current().shapes()[0];
        let (_, shared) = endpoints(&e, first);
        assert_eq!(e.scene().owners_of(shared).len(), 2);
        let arena = e.scene().arena_len();

        assert!(e.undo());
        assert_eq!(e.scene().current().shapes(), &[first]);
        assert_eq!(e.scene().owners_of(shared), vec![first]);
        assert_eq!(e.scene().arena_len(), arena - 2);

        e.select(first).unwrap();
        assert!(e.disconnect_selected().is_empty());
        assert_eq!(endpoints(&e, first).1, shared);

        assert_eq!(e.delete_selected(), 1);
        assert!(!e.scene().contains(shared));
        assert_eq!(e.scene().arena_len(), 0);
    }

    #[test]
    fn test_group_ungroup_and_undo() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        line(&mut e, (300.0, 300.0), (400.0, 300.0));
        let shapes = e.scene().current().shapes().to_vec();

        e.selection().lock().set([shapes[0], shapes[1]]);
        let group = e.group_selected().unwrap();
        assert_eq!(e.scene().current().shapes(), &[group, shapes[2]]);
        assert!(e.selection().is_selected(group));
        assert_eq!(e.scene().get(shapes[0]).unwrap().owner(), Some(group));

        let children = e.ungroup_selected();
        assert_eq!(children, vec![shapes[0], shapes[1]]);
        assert_eq!(e.scene().current().shapes(), &shapes[..]);
        assert!(e.scene().get(shapes[0]).unwrap().state().is_standalone());

        assert!(e.undo());
        assert_eq!(e.scene().current().shapes(), &[group, shapes[2]]);
        assert!(e.undo());
        assert_eq!(e.scene().current().shapes(), &shapes[..]);
    }

    #[test]
    fn test_group_needs_two_shapes() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        e.select_all();
        assert_eq!(e.group_selected(), None);
        assert_eq!(e.scene().current().len(), 1);
    }

    #[test]
    fn test_copy_paste_reshares_points() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        let originals = e.scene().current().shapes().to_vec();
        let shared = endpoints(&e, originals[0]).1;

        e.select_all();
        assert_eq!(e.copy(), 2);
        let pasted = e.paste().unwrap();
        assert_eq!(pasted.len(), 2);
        assert_eq!(e.scene().current().len(), 4);

        let (_, a_end) = endpoints(&e, pasted[0]);
        let (b_start, _) = endpoints(&e, pasted[1]);
        assert_eq!(a_end, b_start);
        assert_ne!(a_end, shared);
        assert_eq!(e.scene().position(a_end), Some(Point::new(100.0, 0.0)));
        assert_eq!(e.selection().lock().len(), 2);

        // A second paste is another independent copy.
        let again = e.paste().unwrap();
        assert!(again.iter().all(|id| !pasted.contains(id)));
    }

    #[test]
    fn test_cut_and_empty_clipboard() {
        let mut e = editor();
        assert!(matches!(e.paste(), Err(EditorError::EmptyClipboard)));

        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        e.select_all();
        assert_eq!(e.cut(), 1);
        assert!(e.scene().current().is_empty());
        assert_eq!(e.scene().arena_len(), 0);
        assert!(e.selection().lock().is_empty());

        let pasted = e.paste().unwrap();
        assert_eq!(e.scene().current().shapes(), &pasted[..]);
    }

    #[test]
    fn test_delete_selected_keeps_shared_point() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        let shapes = e.scene().current().shapes().to_vec();
        let shared = endpoints(&e, shapes[0]).1;

        e.select(shapes[0]).unwrap();
        assert_eq!(e.delete_selected(), 1);
        assert_eq!(e.scene().current().shapes(), &[shapes[1]]);
        assert!(e.scene().contains(shared));
        assert_eq!(e.scene().get(shared).unwrap().owner(), Some(shapes[1]));
        assert_eq!(e.delete_selected(), 0);
    }

    #[test]
    fn test_select_unknown_shape() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        let id = e.scene().current().shapes()[0];
        e.select_all();
        e.delete_selected();
        assert!(matches!(e.select(id), Err(EditorError::UnknownShape)));
    }

    #[test]
    fn test_connect_and_disconnect_commands() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        e.set_tool(ToolKind::Point);
        click(&mut e, 300.0, 300.0);
        let shapes = e.scene().current().shapes().to_vec();
        assert_eq!(shapes.len(), 2);
        let point = shapes[1];
        e.scene.set_position(point, Point::new(105.0, 2.0));
        e.select(point).unwrap();
        assert_eq!(e.connect_selected(), 1);

        let l = shapes[0];
        assert_eq!(endpoints(&e, l).1, point);
        assert_eq!(e.scene().current().shapes(), &[l]);
        assert_eq!(e.scene().position(point), Some(Point::new(100.0, 0.0)));

        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        let second = e.scene().current().shapes()[1];
        assert_eq!(endpoints(&e, second).0, point);
        e.select(second).unwrap();
        let copies = e.disconnect_selected();
        assert_eq!(copies.len(), 1);
        assert_eq!(endpoints(&e, second).0, copies[0]);
        assert_eq!(e.scene().owners_of(point), vec![l]);

        assert!(e.undo());
        assert_eq!(endpoints(&e, second).0, point);
    }

    #[test]
    fn test_drag_group_with_selected_connector() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (100.0, 0.0), (100.0, 100.0));
        e.select_all();
        let group = e.group_selected().unwrap();
        let shapes = e.scene().get(group).unwrap().kind.as_group().unwrap().shapes().to_vec();
        let shared = endpoints(&e, shapes[0]).1;
        e.selection().lock().add(shared);

        e.set_tool(ToolKind::Selection);
        e.left_down(InputArgs::new(50.0, 1.0));
        e.pointer_move(InputArgs::new(55.0, 6.0));
        e.left_up(InputArgs::new(55.0, 6.0));

        assert_eq!(e.scene().position(shared), Some(Point::new(105.0, 5.0)));
        let start = endpoints(&e, shapes[0]).0;
        assert_eq!(e.scene().position(start), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_rubber_band_additive() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        line(&mut e, (0.0, 300.0), (100.0, 300.0));
        let shapes = e.scene().current().shapes().to_vec();

        e.set_tool(ToolKind::Selection);
        e.left_down(InputArgs::new(-10.0, -10.0));
        e.left_up(InputArgs::new(50.0, 10.0));
        assert_eq!(e.selected_shapes(), vec![shapes[0]]);

        let shift = Modifiers::shift();
        e.left_down(InputArgs::new(-10.0, 290.0).with_modifiers(shift));
        e.left_up(InputArgs::new(50.0, 310.0).with_modifiers(shift));
        assert_eq!(e.selected_shapes(), shapes);
    }

    #[test]
    fn test_path_sub_tool_through_editor() {
        let mut e = editor();
        e.set_tool(ToolKind::Path);
        e.left_down(InputArgs::new(0.0, 0.0));
        e.left_down(InputArgs::new(100.0, 0.0));
        e.set_path_sub_tool(PathSubTool::Move);
        e.left_down(InputArgs::new(0.0, 200.0));
        e.left_down(InputArgs::new(100.0, 200.0));
        e.right_down(InputArgs::new(100.0, 200.0));

        let shapes = e.scene().current().shapes().to_vec();
        assert_eq!(shapes.len(), 1);
        let ShapeKind::Path(path) = &e.scene().get(shapes[0]).unwrap().kind else {
            panic!("expected a path");
        };
        assert_eq!(path.geometry.figures.len(), 2);
    }

    #[test]
    fn test_draw_counts_preview() {
        let mut e = editor();
        line(&mut e, (0.0, 0.0), (100.0, 0.0));
        e.set_tool(ToolKind::Rectangle);
        e.left_down(InputArgs::new(200.0, 200.0));

        let mut renderer = RecordingRenderer::new();
        e.draw(&mut renderer);
        assert!(renderer.calls() >= 2);
        assert!(e.host().invalidations() > 0);
    }
}

//! In-memory collaborators for unit tests.

use alloc::boxed::Box;
use alloc::collections::{BTreeSet, VecDeque};
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use spin::Mutex;

use crate::config::{KernelConfig, UserRegion};
use crate::kernel::Kernel;
use crate::mm::{pages_covering, AddressSpace, MappingError, PageFlags, VirtAddr};
use crate::process::Pid;
use crate::services::{
    Clock, Compositor, Console, ImageLoader, Keyboard, LoadedImage, RealTimeClock, Scheduler,
    Services,
};
use crate::time::RtcTime;
use crate::user::SyscallGate;
use crate::window::{ClipRect, GraphicsCommand, Surface, SurfaceId, WindowRef, WindowTable};

/// Accepts any host pointer above the null guard.
pub const TEST_REGION: UserRegion = UserRegion::new(0x1000, usize::MAX);

/// Where every fake image's heap starts.
pub const HEAP_BASE: usize = 0x1000_0000;

/// Executable the harness boots.
pub const ROOT_PATH: &str = "/bin/init";

/// Milliseconds the fake clock advances per yield.
pub const TICK_MS: u64 = 10;

/// Surface id of the root process's full-screen window.
pub const ROOT_SURFACE: SurfaceId = 1;

// ---------------------------------------------------------------------------
// Address space
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SpaceState {
    pages: BTreeSet<usize>,
    map_calls: usize,
    fail_after: Option<usize>,
    refuse_unmap: bool,
}

/// Page set shared between a process and the test that created it.
#[derive(Clone, Default)]
pub struct FakeSpace {
    state: Arc<Mutex<SpaceState>>,
}

impl FakeSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Let `n` more `map` calls succeed, then fail with `OutOfMemory`.
    pub fn fail_after(&self, n: usize) {
        self.state.lock().fail_after = Some(n);
    }

    /// Make every `unmap` fail and leave its pages in place.
    pub fn refuse_unmap(&self, refuse: bool) {
        self.state.lock().refuse_unmap = refuse;
    }

    pub fn is_mapped_at(&self, addr: VirtAddr) -> bool {
        self.state.lock().pages.contains(&addr.align_down().as_usize())
    }

    /// Number of `map` calls, failed ones included.
    pub fn map_calls(&self) -> usize {
        self.state.lock().map_calls
    }

    pub fn mapped_pages(&self) -> usize {
        self.state.lock().pages.len()
    }
}

impl AddressSpace for FakeSpace {
    fn is_mapped(&self, addr: VirtAddr) -> bool {
        self.is_mapped_at(addr)
    }

    fn map(&mut self, addr: VirtAddr, size: usize, _flags: PageFlags) -> Result<(), MappingError> {
        let mut state = self.state.lock();
        state.map_calls += 1;
        if let Some(n) = state.fail_after.as_mut() {
            if *n == 0 {
                return Err(MappingError::OutOfMemory);
            }
            *n -= 1;
        }
        if !addr.is_aligned() {
            return Err(MappingError::MisalignedAddress);
        }
        let end = VirtAddr::new(addr.as_usize() + size);
        let pages: Vec<usize> = pages_covering(addr, end).map(VirtAddr::as_usize).collect();
        if pages.iter().any(|p| state.pages.contains(p)) {
            return Err(MappingError::AlreadyMapped);
        }
        state.pages.extend(pages);
        Ok(())
    }

    fn unmap(&mut self, addr: VirtAddr, size: usize) -> Result<(), MappingError> {
        let mut state = self.state.lock();
        if state.refuse_unmap {
            return Err(MappingError::NotMapped);
        }
        let end = VirtAddr::new(addr.as_usize() + size);
        for page in pages_covering(addr, end) {
            if !state.pages.remove(&page.as_usize()) {
                return Err(MappingError::NotMapped);
            }
        }
        Ok(())
    }
}

/// An image with an empty address space.
pub fn image(heap_base: usize) -> LoadedImage {
    image_in(FakeSpace::new(), heap_base)
}

fn image_in(space: FakeSpace, heap_base: usize) -> LoadedImage {
    LoadedImage {
        space: Box::new(space),
        heap_base: VirtAddr::new(heap_base),
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Knows a fixed set of paths and remembers every space it handed out.
pub struct FakeLoader {
    paths: Vec<&'static str>,
    loaded: Mutex<Vec<(String, FakeSpace)>>,
}

impl FakeLoader {
    pub fn new(paths: &[&'static str]) -> Self {
        Self { paths: paths.to_vec(), loaded: Mutex::new(Vec::new()) }
    }

    /// Spaces of successful loads, in load order.
    pub fn loaded(&self) -> Vec<(String, FakeSpace)> {
        self.loaded.lock().clone()
    }
}

impl ImageLoader for FakeLoader {
    fn load(&self, path: &str) -> Option<LoadedImage> {
        if !self.paths.iter().any(|known| *known == path) {
            return None;
        }
        let space = FakeSpace::new();
        self.loaded.lock().push((String::from(path), space.clone()));
        Some(image_in(space, HEAP_BASE))
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn uptime_ms(&self) -> u64 {
        self.now()
    }
}

pub struct FixedRtc {
    time: Mutex<RtcTime>,
}

impl FixedRtc {
    pub fn new(time: RtcTime) -> Self {
        Self { time: Mutex::new(time) }
    }

    pub fn set(&self, time: RtcTime) {
        *self.time.lock() = time;
    }
}

impl RealTimeClock for FixedRtc {
    fn read(&self) -> RtcTime {
        *self.time.lock()
    }
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

type YieldHook = (usize, Box<dyn FnOnce() + Send>);

#[derive(Default)]
struct SchedulerState {
    current: Pid,
    admitted: Vec<Pid>,
    retired: Vec<Pid>,
    yields: usize,
    hook: Option<YieldHook>,
}

/// Records every call and advances a [`ManualClock`] on each yield.
pub struct FakeScheduler {
    state: Mutex<SchedulerState>,
    clock: Arc<ManualClock>,
}

impl FakeScheduler {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self { state: Mutex::new(SchedulerState::default()), clock }
    }

    pub fn set_current(&self, pid: Pid) {
        self.state.lock().current = pid;
    }

    pub fn admitted(&self) -> Vec<Pid> {
        self.state.lock().admitted.clone()
    }

    pub fn retired(&self) -> Vec<Pid> {
        self.state.lock().retired.clone()
    }

    pub fn yields(&self) -> usize {
        self.state.lock().yields
    }

    /// Run `f` during the `n`th yield from now, as if another process ran.
    pub fn on_yield(&self, n: usize, f: impl FnOnce() + Send + 'static) {
        let mut state = self.state.lock();
        let at = state.yields + n;
        state.hook = Some((at, Box::new(f)));
    }
}

impl Scheduler for FakeScheduler {
    fn current(&self) -> Pid {
        self.state.lock().current
    }

    fn admit(&self, pid: Pid) {
        self.state.lock().admitted.push(pid);
    }

    fn yield_now(&self) {
        let due = {
            let mut state = self.state.lock();
            state.yields += 1;
            let count = state.yields;
            match state.hook.take() {
                Some((at, f)) if at == count => Some(f),
                other => {
                    state.hook = other;
                    None
                }
            }
        };
        self.clock.advance(TICK_MS);
        if let Some(f) = due {
            f();
        }
    }

    fn retire(&self, pid: Pid) {
        self.state.lock().retired.push(pid);
    }
}

// ---------------------------------------------------------------------------
// Compositor
// ---------------------------------------------------------------------------

struct CompositorState {
    next_id: SurfaceId,
    refuse: bool,
    created_from: Vec<SurfaceId>,
    released: Vec<SurfaceId>,
    write_result: i32,
    written: Vec<(usize, Vec<GraphicsCommand>)>,
}

/// Hands out surface ids from 100 and records every request.
pub struct FakeCompositor {
    state: Mutex<CompositorState>,
}

impl FakeCompositor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(CompositorState {
                next_id: 100,
                refuse: false,
                created_from: Vec::new(),
                released: Vec::new(),
                write_result: 0,
                written: Vec::new(),
            }),
        })
    }

    pub fn refuse_create(&self, refuse: bool) {
        self.state.lock().refuse = refuse;
    }

    pub fn set_write_result(&self, result: i32) {
        self.state.lock().write_result = result;
    }

    /// Parent surface of every successful `create`.
    pub fn created_from(&self) -> Vec<SurfaceId> {
        self.state.lock().created_from.clone()
    }

    pub fn released(&self) -> Vec<SurfaceId> {
        self.state.lock().released.clone()
    }

    /// Window count and command list of every `write`.
    pub fn written(&self) -> Vec<(usize, Vec<GraphicsCommand>)> {
        self.state.lock().written.clone()
    }
}

impl Compositor for FakeCompositor {
    fn create(&self, parent: &Surface) -> Option<SurfaceId> {
        let mut state = self.state.lock();
        if state.refuse {
            return None;
        }
        let id = state.next_id;
        state.next_id += 1;
        state.created_from.push(parent.id());
        Some(id)
    }

    fn release(&self, id: SurfaceId) {
        self.state.lock().released.push(id);
    }

    fn write(&self, windows: &WindowTable, commands: &[GraphicsCommand]) -> i32 {
        let mut state = self.state.lock();
        state.written.push((windows.len(), commands.to_vec()));
        state.write_result
    }
}

// ---------------------------------------------------------------------------
// Console and keyboard
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct CapturingConsole {
    writes: Mutex<Vec<Vec<u8>>>,
}

impl CapturingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `write` call, one entry each.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().clone()
    }

    /// Everything written, concatenated.
    pub fn text(&self) -> String {
        let bytes: Vec<u8> = self.writes.lock().concat();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Console for CapturingConsole {
    fn write(&self, bytes: &[u8]) {
        self.writes.lock().push(bytes.to_vec());
    }
}

#[derive(Default)]
pub struct ScriptedKeyboard {
    keys: Mutex<VecDeque<u32>>,
}

impl ScriptedKeyboard {
    pub fn push(&self, code: u32) {
        self.keys.lock().push_back(code);
    }
}

impl Keyboard for ScriptedKeyboard {
    fn read(&self) -> Option<u32> {
        self.keys.lock().pop_front()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// A kernel wired to fakes, with `/bin/init` running as pid 1.
pub struct Harness {
    pub kernel: Arc<Kernel>,
    pub scheduler: Arc<FakeScheduler>,
    pub clock: Arc<ManualClock>,
    pub loader: Arc<FakeLoader>,
    pub compositor: Arc<FakeCompositor>,
    pub console: Arc<CapturingConsole>,
    pub keyboard: Arc<ScriptedKeyboard>,
    pub rtc: Arc<FixedRtc>,
}

impl Harness {
    pub fn with_root() -> Self {
        let clock = Arc::new(ManualClock::new());
        let scheduler = Arc::new(FakeScheduler::new(clock.clone()));
        let loader = Arc::new(FakeLoader::new(&[ROOT_PATH, "/bin/child"]));
        let compositor = FakeCompositor::new();
        let console = Arc::new(CapturingConsole::new());
        let keyboard = Arc::new(ScriptedKeyboard::default());
        let rtc = Arc::new(FixedRtc::new(RtcTime {
            second: 0,
            minute: 0,
            hour: 0,
            day: 1,
            month: 1,
            year: 2024,
        }));

        let services = Services {
            scheduler: scheduler.clone(),
            loader: loader.clone(),
            compositor: compositor.clone(),
            clock: clock.clone(),
            rtc: rtc.clone(),
            keyboard: keyboard.clone(),
            console: console.clone(),
        };
        let config = KernelConfig::DEFAULT.with_user_region(TEST_REGION);
        let kernel = Arc::new(Kernel::new(config, services));

        let mut windows = WindowTable::new();
        windows
            .push(WindowRef::new(ROOT_SURFACE, ClipRect::new(0, 0, 640, 480), compositor.clone()))
            .unwrap();
        let root = kernel.spawn_root(ROOT_PATH, windows).unwrap();
        scheduler.set_current(root);

        Self { kernel, scheduler, clock, loader, compositor, console, keyboard, rtc }
    }

    /// Address space of pid 1, shared with the kernel's copy.
    pub fn root_space(&self) -> FakeSpace {
        self.loader.loaded()[0].1.clone()
    }
}

impl SyscallGate for Harness {
    fn syscall(&self, number: usize, args: [usize; 5]) -> i32 {
        self.kernel.dispatch(number, args)
    }
}

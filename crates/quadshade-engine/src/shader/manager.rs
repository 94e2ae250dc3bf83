use super::{
    compile_stage, link_program, LinkedProgram, ProgramSlot, ShaderError, ShaderPaths, SlotState,
};

/// Turns a linked program into something the renderer can draw with.
///
/// This is the seam between the manager and the graphics driver. Programs are
/// released by dropping them.
pub trait ProgramFactory {
    type Program;

    fn create_program(&mut self, linked: &LinkedProgram) -> Result<Self::Program, ShaderError>;
}

/// Result of a reload request.
#[derive(Debug)]
pub enum ReloadOutcome {
    /// A new program is active; the old one has been released.
    Replaced,
    /// The build failed; the previous program is still active.
    Kept(ShaderError),
}

/// Builds programs from a fixed pair of source files and owns the active one.
pub struct ProgramManager<P> {
    paths: ShaderPaths,
    slot: ProgramSlot<P>,
    generation: u64,
}

impl<P> ProgramManager<P> {
    /// Builds the first program.
    ///
    /// There is nothing to fall back to yet, so a failure here is returned to
    /// the caller instead of being logged and swallowed.
    pub fn new<F>(paths: ShaderPaths, factory: &mut F) -> Result<Self, ShaderError>
    where
        F: ProgramFactory<Program = P>,
    {
        let mut manager = Self {
            paths,
            slot: ProgramSlot::new(),
            generation: 0,
        };

        let program = manager.build_program(factory)?;
        manager.slot.install(program);
        manager.generation = 1;

        Ok(manager)
    }

    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    /// The program the renderer should draw with.
    pub fn active(&self) -> Option<&P> {
        self.slot.get()
    }

    /// Number of programs installed so far, including the first one.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Compiles both stages, links them and creates the program.
    ///
    /// Stops at the first failure: a stage that fails to compile means the
    /// other stage is not read and no link is attempted.
    pub fn build_program<F>(&self, factory: &mut F) -> Result<P, ShaderError>
    where
        F: ProgramFactory<Program = P>,
    {
        let vertex = compile_stage(&self.paths.vertex_source())?;
        let fragment = compile_stage(&self.paths.fragment_source())?;
        let linked = link_program(vertex, fragment)?;
        factory.create_program(&linked)
    }

    /// Rebuilds from disk and swaps the active program on success.
    ///
    /// On failure the error is logged and the current program stays active.
    pub fn reload<F>(&mut self, factory: &mut F) -> ReloadOutcome
    where
        F: ProgramFactory<Program = P>,
    {
        match self.build_program(factory) {
            Ok(program) => {
                self.slot.install(program);
                self.generation += 1;
                log::info!("shader program reloaded (generation {})", self.generation);
                ReloadOutcome::Replaced
            }
            Err(err) => {
                log::error!("shader reload failed, keeping previous program: {err}");
                ReloadOutcome::Kept(err)
            }
        }
    }
}

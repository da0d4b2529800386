//! Qulacs backend implementation.

use num_complex::Complex64;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;
use std::f64::consts::PI;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Instant;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use qubridge_hal::{
    Backend, BackendConfig, BackendFactory, BackendRegistry, Capabilities, CircuitKey,
    ExecutionResult, GateSet, HalError, HalResult, Job, JobId, JobStatus, PreparedCircuit,
    ResultData, RunMode, ShotTable, ValidationResult,
};
use qubridge_ir::{Circuit, InstructionKind};
use qubridge_sim::{DensityMatrix, Device, QuantumState, StateBase};

use crate::config::{QulacsConfig, ResultType};
use crate::convert::{SUPPORTED_GATES, is_supported, map_operator};
use crate::error::ImaginaryResidue;
use crate::program::QulacsCircuit;

/// Registry name of the CPU backend.
pub const CPU_BACKEND: &str = "qulacs";
/// Registry name of the GPU backend.
pub const GPU_BACKEND: &str = "qulacs-gpu";

/// Job data for the backend.
struct QulacsJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Prepared circuits keyed by content hash, evicted oldest first.
#[derive(Default)]
struct PreparedCache {
    entries: FxHashMap<CircuitKey, PreparedCircuit>,
    order: VecDeque<CircuitKey>,
}

impl PreparedCache {
    /// Cached preparation of `circuit`; a key collision counts as a miss.
    fn get(&self, key: CircuitKey, circuit: &Circuit) -> Option<&PreparedCircuit> {
        self.entries.get(&key).filter(|hit| hit.source() == circuit)
    }

    /// Store `prepared` unless the slot already holds an equal circuit,
    /// and return the entry callers should share.
    fn insert(&mut self, prepared: PreparedCircuit, capacity: usize) -> PreparedCircuit {
        let key = prepared.key();
        if let Some(existing) = self.entries.get(&key) {
            if existing.source() == prepared.source() {
                return existing.clone();
            }
            return prepared;
        }
        if capacity == 0 {
            return prepared;
        }
        while self.entries.len() >= capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.order.push_back(key);
        self.entries.insert(key, prepared.clone());
        prepared
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

/// Simulator backend over the qulacs-style engine.
///
/// The CPU and GPU variants share this type and differ only in
/// [`QulacsConfig::device`].
pub struct QulacsBackend {
    name: String,
    config: QulacsConfig,
    capabilities: Capabilities,
    cache: RwLock<PreparedCache>,
    /// Serialises engine runs.
    run_guard: Mutex<()>,
    jobs: Arc<Mutex<FxHashMap<String, QulacsJob>>>,
}

impl QulacsBackend {
    /// Create a CPU state-vector backend with default settings.
    pub fn new() -> Self {
        Self::build(CPU_BACKEND.into(), QulacsConfig::default())
    }

    /// Create a backend on the accelerated execution library.
    pub fn gpu() -> HalResult<Self> {
        Self::with_config(QulacsConfig::default().with_device(Device::Gpu))
    }

    /// Create a backend from typed settings, named after its device.
    pub fn with_config(config: QulacsConfig) -> HalResult<Self> {
        Self::named(device_name(config.device), config)
    }

    fn named(name: impl Into<String>, config: QulacsConfig) -> HalResult<Self> {
        config.check()?;
        Ok(Self::build(name.into(), config))
    }

    fn build(name: String, config: QulacsConfig) -> Self {
        let capabilities = capabilities_for(&name, &config);
        Self {
            name,
            config,
            capabilities,
            cache: RwLock::new(PreparedCache::default()),
            run_guard: Mutex::new(()),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Settings this backend was built with.
    pub fn config(&self) -> &QulacsConfig {
        &self.config
    }

    /// Number of cached prepared circuits.
    pub fn cached_circuits(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every cached prepared circuit.
    pub fn clear_cache(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Number of jobs whose result has not been retrieved.
    pub fn pending_jobs(&self) -> usize {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn check_size(&self, circuit: &Circuit) -> HalResult<()> {
        if circuit.num_qubits() > self.config.max_qubits as usize {
            return Err(HalError::IncompatibleCircuit(format!(
                "Circuit has {} qubits but {} supports at most {}",
                circuit.num_qubits(),
                self.name,
                self.config.max_qubits
            )));
        }
        Ok(())
    }

    fn check_shots(&self, mode: &RunMode) -> HalResult<()> {
        if let RunMode::Shots { n_shots, .. } = mode {
            if *n_shots == 0 || *n_shots > self.capabilities.max_shots as usize {
                return Err(HalError::InvalidShots(format!(
                    "{n_shots} shots requested, expected 1..={}",
                    self.capabilities.max_shots
                )));
            }
        }
        Ok(())
    }

    /// Evolve a fresh state and evaluate `mode` on it.
    fn execute(
        &self,
        program: &QulacsCircuit,
        phase: f64,
        mode: &RunMode,
    ) -> HalResult<(ResultData, Option<u64>)> {
        let n = program.native().num_qubits();
        let options = self.config.sim_options();

        match self.config.result_type {
            ResultType::Statevector => {
                let mut state = QuantumState::with_options(n, options).map_err(|e| {
                    HalError::execution(format!("allocating a {n}-qubit state vector"), e)
                })?;
                evolve(program, &mut state)?;
                if phase != 0.0 {
                    state.multiply_coef(Complex64::from_polar(1.0, PI * phase));
                }
                self.observe(state, program, mode, |s| {
                    ResultData::StateVector(s.into_amplitudes())
                })
            }
            ResultType::DensityMatrix => {
                let mut rho = DensityMatrix::with_options(n, options).map_err(|e| {
                    HalError::execution(format!("allocating a {n}-qubit density matrix"), e)
                })?;
                evolve(program, &mut rho)?;
                self.observe(rho, program, mode, |r| {
                    ResultData::DensityMatrix(r.to_row_major())
                })
            }
        }
    }

    fn observe<S: StateBase>(
        &self,
        state: S,
        program: &QulacsCircuit,
        mode: &RunMode,
        into_data: impl FnOnce(S) -> ResultData,
    ) -> HalResult<(ResultData, Option<u64>)> {
        match mode {
            RunMode::State => Ok((into_data(state), None)),
            RunMode::Shots { n_shots, seed } => {
                let seed = seed.or(self.config.seed).unwrap_or_else(rand::random);
                let readout = program.readout();
                let rows = state
                    .sampling(*n_shots, seed)
                    .into_iter()
                    .map(|outcome| readout.row(outcome))
                    .collect();
                Ok((
                    ResultData::Shots(ShotTable::new(readout.width(), rows)),
                    Some(seed),
                ))
            }
            RunMode::Expectation(operator) => {
                let observable = map_operator(operator, program.qubit_map())?;
                let value = state
                    .expectation_value(&observable)
                    .map_err(|e| HalError::execution("expectation value", e))?;
                let tolerance = self.config.imaginary_tolerance();
                if value.im.abs() > tolerance {
                    return Err(HalError::execution(
                        "expectation value",
                        ImaginaryResidue {
                            imag: value.im,
                            tolerance,
                        },
                    ));
                }
                Ok((ResultData::Expectation(value.re), None))
            }
        }
    }

    fn update_job(&self, job_id: &JobId, outcome: HalResult<ExecutionResult>) {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = jobs.get_mut(&job_id.0) {
            match outcome {
                Ok(result) => {
                    entry.result = Some(result);
                    entry.job.transition(JobStatus::Completed);
                }
                Err(e) => entry.job.transition(JobStatus::Failed(e.to_string())),
            }
        }
    }
}

fn device_name(device: Device) -> &'static str {
    match device {
        Device::Cpu => CPU_BACKEND,
        Device::Gpu => GPU_BACKEND,
    }
}

fn evolve<S: StateBase>(program: &QulacsCircuit, state: &mut S) -> HalResult<()> {
    program
        .native()
        .update_quantum_state(state)
        .map_err(|e| HalError::execution("circuit evolution", e))
}

fn capabilities_for(name: &str, config: &QulacsConfig) -> Capabilities {
    let names_with = |arity: u32| {
        SUPPORTED_GATES
            .iter()
            .filter(move |op| op.num_qubits() == arity)
            .map(|op| op.name())
    };
    let gate_set = GateSet::new(names_with(1), names_with(2), names_with(3));

    let mut caps = Capabilities::simulator(name, config.max_qubits, gate_set)
        .with_feature("shots")
        .with_feature("expectation");
    caps = match config.result_type {
        ResultType::Statevector => caps.with_feature("statevector"),
        ResultType::DensityMatrix => caps.with_feature("density_matrix"),
    };
    if config.device == Device::Gpu {
        caps = caps.with_feature("gpu");
    }
    caps
}

impl Default for QulacsBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for QulacsBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.config.max_qubits as usize {
            reasons.push(format!(
                "Circuit has {} qubits but {} supports at most {}",
                circuit.num_qubits(),
                self.name,
                self.config.max_qubits
            ));
        }

        let mut measured = FxHashSet::default();
        for (position, inst) in circuit.iter().enumerate() {
            match &inst.kind {
                InstructionKind::Measure => {
                    measured.extend(inst.qubits.iter().copied());
                    continue;
                }
                InstructionKind::Barrier => continue,
                InstructionKind::Reset => {
                    reasons.push(format!("Unsupported gate 'reset' at instruction {position}"));
                }
                InstructionKind::Gate(gate) => {
                    if !gate.kind.op_type().is_some_and(is_supported) {
                        reasons.push(format!(
                            "Unsupported gate '{}' at instruction {position}",
                            gate.name()
                        ));
                    }
                    let symbols: Vec<_> = gate
                        .params
                        .iter()
                        .flat_map(|p| p.symbols())
                        .collect();
                    if !symbols.is_empty() {
                        reasons.push(format!(
                            "Gate '{}' at instruction {position} has unbound parameters: {}",
                            gate.name(),
                            symbols.join(", ")
                        ));
                    }
                }
            }
            if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                reasons.push(format!(
                    "Gate '{}' at instruction {position} acts on measured qubit {}",
                    inst.name(),
                    q
                ));
            }
        }

        Ok(ValidationResult::from_reasons(reasons))
    }

    #[instrument(skip(self, circuit), fields(backend = %self.name, circuit = circuit.name()))]
    fn prepare(&self, circuit: &Circuit) -> HalResult<PreparedCircuit> {
        self.check_size(circuit)?;
        let key = CircuitKey::of(circuit)?;

        if self.config.cache {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(hit) = cache.get(key, circuit) {
                debug!("Prepared circuit cache hit: {}", key);
                return Ok(hit.clone());
            }
        }

        let program = QulacsCircuit::compile(circuit)?;
        debug!(
            "Prepared circuit {}: {} native gates on {} qubits",
            key,
            program.native().len(),
            program.native().num_qubits()
        );
        let prepared = PreparedCircuit::new(
            self.name.clone(),
            key,
            Arc::new(circuit.clone()),
            Arc::new(program),
        );

        if self.config.cache {
            let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
            return Ok(cache.insert(prepared, self.config.cache_capacity));
        }
        Ok(prepared)
    }

    #[instrument(skip(self, prepared, mode), fields(backend = %self.name, mode = mode.label()))]
    fn run(&self, prepared: &PreparedCircuit, mode: &RunMode) -> HalResult<ExecutionResult> {
        if prepared.backend() != self.name {
            return Err(HalError::IncompatibleCircuit(format!(
                "Circuit was prepared by '{}', not '{}'",
                prepared.backend(),
                self.name
            )));
        }
        let program = prepared.native::<QulacsCircuit>().ok_or_else(|| {
            HalError::IncompatibleCircuit("Prepared payload is not a qulacs circuit".into())
        })?;
        self.check_shots(mode)?;

        let _guard = self.run_guard.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        let num_qubits = program.native().num_qubits();
        debug!(
            "Starting {} run: {} qubits, {} gates",
            mode.label(),
            num_qubits,
            program.native().len()
        );

        let (data, seed) = self.execute(program, prepared.source().phase(), mode)?;

        let elapsed = start.elapsed();
        debug!("Run completed in {:?}", elapsed);

        let mut result = ExecutionResult::new(data, self.name.clone(), num_qubits)
            .with_execution_time(elapsed.as_millis() as u64);
        if let Some(seed) = seed {
            result = result.with_seed(seed);
        }
        Ok(result)
    }

    #[instrument(skip(self, circuit, mode), fields(backend = %self.name))]
    fn submit(&self, circuit: &Circuit, mode: RunMode) -> HalResult<JobId> {
        let prepared = self.prepare(circuit)?;
        self.check_shots(&mode)?;

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), mode.label()).with_backend(self.name.clone());
        {
            let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
            let entry = jobs.entry(job_id.0.clone()).or_insert(QulacsJob {
                job,
                result: None,
            });
            entry.job.transition(JobStatus::Running);
        }
        debug!("Submitted job: {}", job_id);

        let outcome = self.run(&prepared, &mode);
        if let Err(e) = &outcome {
            info!("Job {} failed: {}", job_id, e);
        }
        self.update_job(&job_id, outcome);

        Ok(job_id)
    }

    fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        let jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        jobs.get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    /// Hand out the outcome of a finished job and forget the job.
    fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let mut jobs = self.jobs.lock().unwrap_or_else(PoisonError::into_inner);
        let status = jobs
            .get(&job_id.0)
            .map(|entry| entry.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        if !status.is_terminal() {
            return Err(HalError::JobFailed(format!(
                "Job {job_id} has no result ({status})"
            )));
        }
        let entry = jobs
            .remove(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (entry.job.status, entry.result) {
            (JobStatus::Completed, Some(result)) => Ok(result),
            (JobStatus::Failed(reason), _) => Err(HalError::JobFailed(reason)),
            (status, _) => Err(HalError::JobFailed(format!(
                "Job {job_id} has no result ({status})"
            ))),
        }
    }
}

impl BackendFactory for QulacsBackend {
    /// Registry names follow the configured device; other names are kept.
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let settings: QulacsConfig = config.extra_as()?;
        if config.name == CPU_BACKEND || config.name == GPU_BACKEND {
            return Self::with_config(settings);
        }
        Self::named(config.name, settings)
    }
}

/// Register the CPU (`"qulacs"`) and GPU (`"qulacs-gpu"`) backends.
pub fn register_backends(registry: &mut BackendRegistry) {
    registry.register::<QulacsBackend>(CPU_BACKEND);
    registry.register_factory(GPU_BACKEND, |mut config| {
        let gpu = serde_json::Value::from("gpu");
        if let Some(device) = config.extra.get("device").filter(|d| **d != gpu) {
            return Err(HalError::Configuration(format!(
                "'{GPU_BACKEND}' runs on device \"gpu\", not {device}"
            )));
        }
        config.extra.insert("device".into(), gpu);
        let backend = QulacsBackend::from_config(config)?;
        Ok(Box::new(backend))
    });
}

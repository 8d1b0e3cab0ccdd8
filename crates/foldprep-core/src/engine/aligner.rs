use super::config::AlignerConfig;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::{debug, error, info};

/// Name of the working directory shared by all proteins of a run, inside the output location.
pub const WORK_DIR_NAME: &str = "tmp";

/// Outcome of one protein's MSA search. Failure is not an error: the protein is still
/// emitted, just without an MSA path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlignmentResult {
    Success(PathBuf),
    Failed,
}

impl AlignmentResult {
    pub fn path(&self) -> Option<&Path> {
        match self {
            AlignmentResult::Success(path) => Some(path),
            AlignmentResult::Failed => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AlignmentResult::Success(_))
    }
}

/// Produces an alignment file for a protein from a query sequence file.
///
/// `scope` namespaces the artifacts of one sequence-set file, since protein identifiers
/// are only unique within a file.
pub trait Aligner {
    fn align(&self, scope: &str, protein_id: &str, query: &Path) -> AlignmentResult;
}

/// The four external invocations, in the order they must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentStep {
    CreateDb,
    Search,
    Align,
    ConvertAlis,
}

impl AlignmentStep {
    pub const ALL: [AlignmentStep; 4] = [
        AlignmentStep::CreateDb,
        AlignmentStep::Search,
        AlignmentStep::Align,
        AlignmentStep::ConvertAlis,
    ];

    pub fn subcommand(self) -> &'static str {
        match self {
            AlignmentStep::CreateDb => "createdb",
            AlignmentStep::Search => "search",
            AlignmentStep::Align => "align",
            AlignmentStep::ConvertAlis => "convertalis",
        }
    }
}

impl fmt::Display for AlignmentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subcommand())
    }
}

#[derive(Debug, Error)]
pub enum AlignerError {
    #[error("step '{step}' could not be started: {source}")]
    Spawn {
        step: AlignmentStep,
        #[source]
        source: io::Error,
    },
    #[error("step '{step}' exited with status {code:?}: {stderr}")]
    Exit {
        step: AlignmentStep,
        code: Option<i32>,
        stderr: String,
    },
    #[error("all steps succeeded but '{path}' was not produced", path = path.display())]
    MissingArtifact { path: PathBuf },
    #[error("failed to prepare '{path}': {source}", path = path.display())]
    Prepare {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Per-protein files touched by the step chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentArtifacts {
    pub query_db: PathBuf,
    pub result: PathBuf,
    pub aligned: PathBuf,
    pub msa: PathBuf,
}

/// Runs `createdb`, `search`, `align -a` and `convertalis` against a fixed reference
/// database. Intermediate files live in the shared work directory and are left in place.
#[derive(Debug, Clone)]
pub struct MmseqsAligner {
    config: AlignerConfig,
    output_dir: PathBuf,
    work_dir: PathBuf,
}

impl MmseqsAligner {
    pub fn new(config: AlignerConfig, output_dir: &Path) -> io::Result<Self> {
        let work_dir = output_dir.join(WORK_DIR_NAME);
        fs::create_dir_all(&work_dir)?;
        Ok(Self {
            config,
            output_dir: output_dir.to_path_buf(),
            work_dir,
        })
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Intermediates go to `tmp/<scope>/`, the MSA to `<out>/<scope>/<id>_unpaired.a3m`.
    pub fn artifacts(&self, scope: &str, protein_id: &str) -> AlignmentArtifacts {
        let work_dir = self.work_dir.join(scope);
        AlignmentArtifacts {
            query_db: work_dir.join(format!("{}_db", protein_id)),
            result: work_dir.join(format!("{}_result", protein_id)),
            aligned: work_dir.join(format!("{}_aligned", protein_id)),
            msa: self
                .output_dir
                .join(scope)
                .join(format!("{}_unpaired.a3m", protein_id)),
        }
    }

    pub fn step_args(
        &self,
        step: AlignmentStep,
        query: &Path,
        artifacts: &AlignmentArtifacts,
    ) -> Vec<OsString> {
        let threads = self.config.threads.to_string();
        let database = self.config.database.as_os_str();
        let tail: Vec<OsString> = match step {
            AlignmentStep::CreateDb => vec![query.into(), artifacts.query_db.clone().into()],
            AlignmentStep::Search => vec![
                artifacts.query_db.clone().into(),
                database.into(),
                artifacts.result.clone().into(),
                self.work_dir.clone().into(),
                "--threads".into(),
                threads.into(),
                "--max-seqs".into(),
                self.config.max_seqs.to_string().into(),
            ],
            AlignmentStep::Align => vec![
                artifacts.query_db.clone().into(),
                database.into(),
                artifacts.result.clone().into(),
                artifacts.aligned.clone().into(),
                "--threads".into(),
                threads.into(),
                "-a".into(),
            ],
            AlignmentStep::ConvertAlis => vec![
                artifacts.query_db.clone().into(),
                database.into(),
                artifacts.aligned.clone().into(),
                artifacts.msa.clone().into(),
                "--format-mode".into(),
                self.config.format_mode.to_string().into(),
            ],
        };

        let mut args = Vec::with_capacity(tail.len() + 1);
        args.push(OsString::from(step.subcommand()));
        args.extend(tail);
        args
    }

    fn run_step(&self, step: AlignmentStep, args: &[OsString]) -> Result<(), AlignerError> {
        debug!(%step, ?args, "Running aligner step.");
        let output = Command::new(&self.config.executable)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| AlignerError::Spawn { step, source })?;

        if !output.status.success() {
            return Err(AlignerError::Exit {
                step,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    /// Runs the step chain, stopping at the first failing step.
    pub fn try_align(
        &self,
        scope: &str,
        protein_id: &str,
        query: &Path,
    ) -> Result<PathBuf, AlignerError> {
        let artifacts = self.artifacts(scope, protein_id);
        prepare_artifacts(&artifacts)?;
        for step in AlignmentStep::ALL {
            let args = self.step_args(step, query, &artifacts);
            self.run_step(step, &args)?;
        }

        if !artifacts.msa.exists() {
            return Err(AlignerError::MissingArtifact {
                path: artifacts.msa,
            });
        }
        Ok(artifacts.msa)
    }
}

/// Creates the artifact directories and clears a stale MSA, so the final existence check
/// only passes for a file written by this chain.
fn prepare_artifacts(artifacts: &AlignmentArtifacts) -> Result<(), AlignerError> {
    for path in [&artifacts.query_db, &artifacts.msa] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| AlignerError::Prepare {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    match fs::remove_file(&artifacts.msa) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(AlignerError::Prepare {
            path: artifacts.msa.clone(),
            source: e,
        }),
        _ => Ok(()),
    }
}

impl Aligner for MmseqsAligner {
    fn align(&self, scope: &str, protein_id: &str, query: &Path) -> AlignmentResult {
        match self.try_align(scope, protein_id, query) {
            Ok(msa) => {
                info!("Generated MSA for {}: {:?}", protein_id, msa);
                AlignmentResult::Success(msa)
            }
            Err(e) => {
                error!("MMseqs2 failed for {}: {}. Skipping MSA.", protein_id, e);
                AlignmentResult::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(executable: PathBuf) -> AlignerConfig {
        AlignerConfig {
            executable,
            database: PathBuf::from("/db/uniref90"),
            threads: 4,
            max_seqs: 1000,
            format_mode: 3,
        }
    }

    fn strings(args: &[OsString]) -> Vec<String> {
        args.iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn new_creates_the_shared_work_directory() {
        let dir = tempfile::tempdir().unwrap();
        let aligner = MmseqsAligner::new(config(PathBuf::from("mmseqs")), dir.path()).unwrap();
        assert!(aligner.work_dir().is_dir());
        assert_eq!(aligner.work_dir(), dir.path().join("tmp"));

        MmseqsAligner::new(config(PathBuf::from("mmseqs")), dir.path()).unwrap();
    }

    #[test]
    fn artifacts_are_named_after_the_scope_and_protein() {
        let dir = tempfile::tempdir().unwrap();
        let aligner = MmseqsAligner::new(config(PathBuf::from("mmseqs")), dir.path()).unwrap();
        let artifacts = aligner.artifacts("a", "P1");
        assert_eq!(artifacts.query_db, dir.path().join("tmp/a/P1_db"));
        assert_eq!(artifacts.result, dir.path().join("tmp/a/P1_result"));
        assert_eq!(artifacts.aligned, dir.path().join("tmp/a/P1_aligned"));
        assert_eq!(artifacts.msa, dir.path().join("a/P1_unpaired.a3m"));
    }

    #[test]
    fn same_protein_in_two_scopes_does_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let aligner = MmseqsAligner::new(config(PathBuf::from("mmseqs")), dir.path()).unwrap();
        let a = aligner.artifacts("a", "P1");
        let b = aligner.artifacts("b", "P1");
        assert_ne!(a.query_db, b.query_db);
        assert_ne!(a.result, b.result);
        assert_ne!(a.aligned, b.aligned);
        assert_ne!(a.msa, b.msa);
    }

    #[test]
    fn step_arguments_match_the_expected_invocations() {
        let aligner = MmseqsAligner {
            config: config(PathBuf::from("mmseqs")),
            output_dir: PathBuf::from("out"),
            work_dir: PathBuf::from("out/tmp"),
        };
        let artifacts = aligner.artifacts("p", "P1");
        let query = Path::new("in/p.fasta");

        assert_eq!(
            strings(&aligner.step_args(AlignmentStep::CreateDb, query, &artifacts)),
            vec!["createdb", "in/p.fasta", "out/tmp/p/P1_db"]
        );
        assert_eq!(
            strings(&aligner.step_args(AlignmentStep::Search, query, &artifacts)),
            vec![
                "search", "out/tmp/p/P1_db", "/db/uniref90", "out/tmp/p/P1_result", "out/tmp",
                "--threads", "4", "--max-seqs", "1000"
            ]
        );
        assert_eq!(
            strings(&aligner.step_args(AlignmentStep::Align, query, &artifacts)),
            vec![
                "align", "out/tmp/p/P1_db", "/db/uniref90", "out/tmp/p/P1_result",
                "out/tmp/p/P1_aligned", "--threads", "4", "-a"
            ]
        );
        assert_eq!(
            strings(&aligner.step_args(AlignmentStep::ConvertAlis, query, &artifacts)),
            vec![
                "convertalis", "out/tmp/p/P1_db", "/db/uniref90", "out/tmp/p/P1_aligned",
                "out/p/P1_unpaired.a3m", "--format-mode", "3"
            ]
        );
    }

    #[test]
    fn missing_executable_is_a_failed_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let aligner =
            MmseqsAligner::new(config(dir.path().join("no-such-mmseqs")), dir.path()).unwrap();
        let err = aligner
            .try_align("q", "P1", &dir.path().join("q.fasta"))
            .unwrap_err();
        assert!(matches!(
            err,
            AlignerError::Spawn {
                step: AlignmentStep::CreateDb,
                ..
            }
        ));
        assert_eq!(
            aligner.align("q", "P1", &dir.path().join("q.fasta")),
            AlignmentResult::Failed
        );
    }

    #[cfg(unix)]
    mod with_fake_binary {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        // Logs every call next to the script. `search` fails for P3; `convertalis`
        // exits cleanly for P4 without writing the MSA.
        const FAKE_MMSEQS: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
case "$1" in
  createdb) : > "$3" ;;
  search)
    case "$2" in */P3_db) echo "search crashed" >&2; exit 1 ;; esac
    : > "$4" ;;
  align) : > "$5" ;;
  convertalis)
    case "$2" in */P4_db) exit 0 ;; esac
    printf '>query\nMKT\n' > "$5" ;;
esac
exit 0
"#;

        fn install(dir: &Path) -> PathBuf {
            let path = dir.join("mmseqs");
            fs::write(&path, FAKE_MMSEQS).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        fn calls(dir: &Path) -> Vec<String> {
            fs::read_to_string(dir.join("calls.log"))
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        #[test]
        fn successful_chain_returns_the_msa_path() {
            let bin_dir = tempfile::tempdir().unwrap();
            let out_dir = tempfile::tempdir().unwrap();
            let aligner = MmseqsAligner::new(config(install(bin_dir.path())), out_dir.path())
                .unwrap();

            let result = aligner.align("q", "P1", &out_dir.path().join("q.fasta"));
            assert_eq!(
                result,
                AlignmentResult::Success(out_dir.path().join("q/P1_unpaired.a3m"))
            );

            let subcommands: Vec<_> = calls(bin_dir.path())
                .iter()
                .map(|c| c.split_whitespace().next().unwrap().to_string())
                .collect();
            assert_eq!(subcommands, vec!["createdb", "search", "align", "convertalis"]);
        }

        #[test]
        fn failing_search_stops_the_chain() {
            let bin_dir = tempfile::tempdir().unwrap();
            let out_dir = tempfile::tempdir().unwrap();
            let aligner = MmseqsAligner::new(config(install(bin_dir.path())), out_dir.path())
                .unwrap();

            let err = aligner
                .try_align("q", "P3", &out_dir.path().join("q.fasta"))
                .unwrap_err();
            match err {
                AlignerError::Exit { step, code, stderr } => {
                    assert_eq!(step, AlignmentStep::Search);
                    assert_eq!(code, Some(1));
                    assert_eq!(stderr, "search crashed");
                }
                other => panic!("unexpected error: {other:?}"),
            }
            assert_eq!(calls(bin_dir.path()).len(), 2);
            assert!(!out_dir.path().join("q/P3_unpaired.a3m").exists());
        }

        #[test]
        fn missing_artifact_after_success_is_a_failure() {
            let bin_dir = tempfile::tempdir().unwrap();
            let out_dir = tempfile::tempdir().unwrap();
            let aligner = MmseqsAligner::new(config(install(bin_dir.path())), out_dir.path())
                .unwrap();

            let err = aligner
                .try_align("q", "P4", &out_dir.path().join("q.fasta"))
                .unwrap_err();
            assert!(matches!(err, AlignerError::MissingArtifact { .. }));
            assert_eq!(
                aligner.align("q", "P4", &out_dir.path().join("q.fasta")),
                AlignmentResult::Failed
            );
        }

        #[test]
        fn stale_msa_does_not_count_as_a_result() {
            let bin_dir = tempfile::tempdir().unwrap();
            let out_dir = tempfile::tempdir().unwrap();
            let aligner = MmseqsAligner::new(config(install(bin_dir.path())), out_dir.path())
                .unwrap();
            let stale = aligner.artifacts("q", "P4").msa;
            fs::create_dir_all(stale.parent().unwrap()).unwrap();
            fs::write(&stale, ">old\nAAA\n").unwrap();

            let err = aligner
                .try_align("q", "P4", &out_dir.path().join("q.fasta"))
                .unwrap_err();
            assert!(matches!(err, AlignerError::MissingArtifact { .. }));
            assert!(!stale.exists());
        }
    }
}

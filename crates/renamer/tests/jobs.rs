use std::path::PathBuf;

use renamer::config::Settings;
use renamer::loader::load_job;
use renamer::{MemoryScene, SceneNodes, SceneUniverse, apply_plan};

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn run(name: &str) -> (Vec<String>, MemoryScene) {
    let settings = Settings::default();
    let mut job = load_job(&demo(name), &settings).expect("load demo");
    let mut scene = MemoryScene::new(job.existing.iter().cloned());
    for item in &job.items {
        scene.insert(item.display_name.clone());
    }
    let names = job
        .preview(&settings.resolver(), &SceneUniverse(&scene))
        .expect("generate");
    let report = apply_plan(&mut job.items, &mut scene);
    assert!(report.failed.is_empty(), "{:?}", report.failed);
    (names, scene)
}

#[test]
fn arm_chain_skips_existing_joint() {
    let (names, scene) = run("arm_chain.toml");
    assert_eq!(names, vec!["L_arm_01_jnt", "L_arm_02_jnt", "L_arm_03_jnt"]);
    assert!(!scene.node_exists("joint1"));
    assert!(scene.node_exists("L_arm_00_jnt"));
}

#[test]
fn fingers_use_capital_letters() {
    let (names, scene) = run("fingers.yaml");
    assert_eq!(
        names,
        vec!["R_finger_B_ctrl", "R_finger_C_ctrl", "R_finger_D_ctrl"]
    );
    assert_eq!(scene.len(), 4);
}

#[test]
fn mirror_edits_only_touch_joints() {
    let (names, scene) = run("mirror.toml");
    assert_eq!(names, vec!["R_arm_jnt", "R_leg_jnt", "R_arm_jnt_0"]);
    assert!(scene.node_exists("L_arm_geo"));
    assert!(scene.node_exists("R_arm_jnt_0"));
    assert!(!scene.node_exists("L_arm"));
}

#[test]
fn spine_named_by_rule() {
    let (names, scene) = run("spine_auto.yaml");
    assert_eq!(
        names,
        vec!["C_spine_00_jnt", "C_spine_01_jnt", "C_spine_02_jnt"]
    );
    assert!(scene.node_exists("C_pelvis_jnt"));
    assert_eq!(scene.len(), 4);
}

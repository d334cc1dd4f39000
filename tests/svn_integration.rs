//! 需要本机安装 svn 与 svnadmin，默认忽略：
//! `cargo test -- --ignored`

use std::{fs, path::Path, process::Command};

use svnkit::{
    core::{
        command::{ConflictAccept, DiffOptions, LogOptions, StatusOptions, SvnCommand, UpdateOptions},
        config::Settings,
        context::{BranchLocation, SvnContext},
        svn::SvnService,
    },
    parse::{conflict::ConflictKind, status::StatusKind},
};
use tokio_util::sync::CancellationToken;

fn svnadmin_create(path: &Path) {
    let status = Command::new("svnadmin").arg("create").arg(path).status().unwrap();
    assert!(status.success());
}

fn file_url(path: &Path) -> String {
    url::Url::from_directory_path(path).unwrap().as_str().trim_end_matches('/').to_string()
}

async fn run(svn: &SvnService, command: SvnCommand) -> String {
    svn.execute(&command).await.unwrap().into_output().unwrap()
}

#[tokio::test]
#[ignore]
async fn test_round_trip_against_local_repository() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("repo");
    svnadmin_create(&repo);
    let repo_url = file_url(&repo);

    let svn = SvnService::new(Settings::default());
    let cancel = CancellationToken::new();
    assert!(svn.is_available().await);

    let trunk = format!("{}/proj/trunk", repo_url);
    run(&svn, SvnCommand::mkdir(&[trunk.as_str()], Some("layout"), true)).await;

    let wc = root.path().join("wc");
    let wc_str = wc.to_string_lossy().to_string();
    run(&svn, SvnCommand::checkout(&trunk, Some(wc_str.as_str()), None, None)).await;

    fs::write(wc.join("a.txt"), "one\ntwo\n").unwrap();
    let status = svn.status(&wc, None, &StatusOptions::default(), &cancel).await.unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].item, StatusKind::Unversioned);

    run(&svn, SvnCommand::add(&["a.txt"], false, false, false).in_dir(&wc)).await;
    run(&svn, SvnCommand::commit(&[], "add a").in_dir(&wc)).await;
    run(&svn, SvnCommand::update(&[], &Default::default()).in_dir(&wc)).await;

    fs::write(wc.join("a.txt"), "one\nTWO\nthree\n").unwrap();
    let diff = svn.diff(&wc, None, &DiffOptions::default(), &cancel).await.unwrap();
    assert_eq!(diff.len(), 1);
    assert_eq!(diff[0].addition_count(), 2);
    assert_eq!(diff[0].deletion_count(), 1);

    let log = svn.log(&wc, None, &LogOptions::default(), &cancel).await.unwrap();
    assert_eq!(log.first().map(|e| e.message.as_str()), Some("add a"));

    let blame = svn.blame(&wc, "a.txt", None, &cancel).await.unwrap();
    assert_eq!(blame.len(), 2);
    assert_eq!(blame[1].content, "two");

    let context = SvnContext::load(&svn, &wc, &cancel).await.unwrap();
    assert_eq!(context.location(), &BranchLocation::Trunk);
    assert_eq!(context.get_branch_url("b1"), format!("{}/proj/branches/b1", repo_url));

    assert!(svn.conflicts(&wc, &cancel).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore]
async fn test_text_conflict_is_reported_with_its_files() {
    let root = tempfile::tempdir().unwrap();
    let repo = root.path().join("repo");
    svnadmin_create(&repo);
    let repo_url = file_url(&repo);
    let svn = SvnService::new(Settings::default());
    let cancel = CancellationToken::new();

    let mine = root.path().join("mine");
    let theirs = root.path().join("theirs");
    for wc in [&mine, &theirs] {
        let path = wc.to_string_lossy().to_string();
        run(&svn, SvnCommand::checkout(&repo_url, Some(path.as_str()), None, None)).await;
    }

    fs::write(mine.join("f.txt"), "base\n").unwrap();
    run(&svn, SvnCommand::add(&["f.txt"], false, false, false).in_dir(&mine)).await;
    run(&svn, SvnCommand::commit(&[], "base").in_dir(&mine)).await;

    run(&svn, SvnCommand::update(&[], &Default::default()).in_dir(&theirs)).await;
    fs::write(theirs.join("f.txt"), "theirs\n").unwrap();
    run(&svn, SvnCommand::commit(&[], "theirs").in_dir(&theirs)).await;

    fs::write(mine.join("f.txt"), "mine\n").unwrap();
    let update = SvnCommand::update(
        &[],
        &UpdateOptions {
            accept: Some(ConflictAccept::Postpone),
            ..Default::default()
        },
    )
    .in_dir(&mine);
    run(&svn, update).await;

    let conflicts = svn.conflicts(&mine, &cancel).await.unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::Standard);

    let files = svn.conflict_files(&mine, &conflicts[0].path, &cancel).await.unwrap();
    assert!(files.mine.is_some_and(|p| p.exists()));
    assert!(files.theirs.is_some_and(|p| p.exists()));
}

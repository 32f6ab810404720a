//! In-memory archive tree browsed by the Archives window and the console.

use indoc::indoc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Dir(Vec<FileNode>),
    File { size: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub name: String,
    pub date: Option<String>,
    pub security_level: Option<String>,
    pub kind: NodeKind,
}

impl FileNode {
    pub fn dir(name: &str, children: Vec<FileNode>) -> Self {
        Self {
            name: name.to_string(),
            date: None,
            security_level: None,
            kind: NodeKind::Dir(children),
        }
    }

    pub fn file(name: &str, size: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            date: None,
            security_level: None,
            kind: NodeKind::File {
                size: size.to_string(),
                content: content.trim_end().to_string(),
            },
        }
    }

    pub fn dated(mut self, date: &str) -> Self {
        self.date = Some(date.to_string());
        self
    }

    pub fn classified(mut self, level: &str) -> Self {
        self.security_level = Some(level.to_string());
        self
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.kind, NodeKind::Dir(_))
    }

    pub fn children(&self) -> &[FileNode] {
        match &self.kind {
            NodeKind::Dir(children) => children,
            NodeKind::File { .. } => &[],
        }
    }

    pub fn content(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { content, .. } => Some(content),
            NodeKind::Dir(_) => None,
        }
    }

    pub fn size(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::File { size, .. } => Some(size),
            NodeKind::Dir(_) => None,
        }
    }
}

/// A tree plus a working-directory cursor into it.
#[derive(Debug, Clone)]
pub struct Archive {
    root: FileNode,
    // child indices from the root to the working directory
    path: Vec<usize>,
}

impl Archive {
    pub fn new(root: FileNode) -> Self {
        Self {
            root,
            path: Vec::new(),
        }
    }

    pub fn cwd(&self) -> &FileNode {
        self.path
            .iter()
            .fold(&self.root, |node, &index| &node.children()[index])
    }

    pub fn entries(&self) -> &[FileNode] {
        self.cwd().children()
    }

    pub fn at_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Absolute path of the working directory, e.g. `/ROOT/NERV_DATABANK`.
    pub fn path_string(&self) -> String {
        let mut node = &self.root;
        let mut out = format!("/{}", node.name);
        for &index in &self.path {
            node = &node.children()[index];
            out.push('/');
            out.push_str(&node.name);
        }
        out
    }

    /// Enter the child directory at `index`. Returns `false` when it is not
    /// a directory.
    pub fn enter_index(&mut self, index: usize) -> bool {
        match self.entries().get(index) {
            Some(node) if node.is_dir() => {
                self.path.push(index);
                true
            }
            _ => false,
        }
    }

    /// Enter the child directory called `name`.
    pub fn enter(&mut self, name: &str) -> bool {
        let found = self
            .entries()
            .iter()
            .position(|node| node.is_dir() && node.name == name);
        match found {
            Some(index) => self.enter_index(index),
            None => false,
        }
    }

    /// Go to the parent directory. Returns `false` at the root.
    pub fn up(&mut self) -> bool {
        self.path.pop().is_some()
    }

    fn cwd_children_mut(&mut self) -> Option<&mut Vec<FileNode>> {
        let mut node = &mut self.root;
        for &step in &self.path {
            let NodeKind::Dir(children) = &mut node.kind else {
                return None;
            };
            node = children.get_mut(step)?;
        }
        match &mut node.kind {
            NodeKind::Dir(children) => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    /// Delete the entry at `index` from the working directory.
    pub fn remove(&mut self, index: usize) -> Option<FileNode> {
        let children = self.cwd_children_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Append `node` to the working directory, returning its index.
    pub fn insert(&mut self, node: FileNode) -> Option<usize> {
        let children = self.cwd_children_mut()?;
        children.push(node);
        Some(children.len() - 1)
    }

    pub fn rename(&mut self, index: usize, name: &str) -> bool {
        match self.cwd_children_mut().and_then(|c| c.get_mut(index)) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    pub fn find_file(&self, name: &str) -> Option<&FileNode> {
        self.entries()
            .iter()
            .find(|node| !node.is_dir() && node.name == name)
    }
}

/// The stock NERV archive.
pub fn seed() -> FileNode {
    FileNode::dir(
        "ROOT",
        vec![
            FileNode::dir(
                "NERV_DATABANK",
                vec![
                    FileNode::dir("PERSONNEL", personnel_files()).dated("2015-09-01"),
                    FileNode::dir("ANGEL_RECORDS", angel_files())
                        .dated("2015-12-30")
                        .classified("TOP SECRET"),
                    FileNode::dir("PROJECT_E", project_files())
                        .dated("2000-09-13")
                        .classified("TOP SECRET"),
                    FileNode::dir("MAGI_INTERNAL", magi_files())
                        .dated("2010-05-30")
                        .classified("MAGI ONLY"),
                ],
            )
            .dated("2015-06-22")
            .classified("LEVEL 5"),
        ],
    )
}

fn personnel_files() -> Vec<FileNode> {
    vec![
        FileNode::file(
            "IKARI_G.biodata",
            "42KB",
            indoc! {"
                NAME: IKARI GENDO
                ROLE: SUPREME COMMANDER
                STATUS: ACTIVE
                CLEARANCE: LEVEL 5 (UNLIMITED)
            "},
        )
        .dated("2010-01-14"),
        FileNode::file(
            "KATSURAGI_M.biodata",
            "38KB",
            indoc! {"
                NAME: KATSURAGI MISATO
                ROLE: TACTICAL OPERATIONS DIRECTOR
                RANK: MAJOR
                STATUS: ACTIVE
            "},
        )
        .dated("2014-12-10"),
        FileNode::file(
            "AYANAMI_R.biodata",
            "12KB",
            indoc! {"
                NAME: AYANAMI REI
                ROLE: FIRST CHILD / PILOT UNIT-00
                STATUS: ACTIVE
                MEDICAL RECORDS: DATA CORRUPTED...
            "},
        )
        .dated("2015-01-01"),
        FileNode::file(
            "IKARI_S.biodata",
            "20KB",
            indoc! {"
                NAME: IKARI SHINJI
                ROLE: THIRD CHILD / PILOT UNIT-01
                INITIAL SYNC RATE: 41.3%
            "},
        )
        .dated("2015-06-01"),
    ]
}

fn angel_files() -> Vec<FileNode> {
    vec![
        FileNode::file(
            "03_SACHIEL.rep",
            "15MB",
            indoc! {"
                CODENAME: SACHIEL
                TYPE: 3RD ANGEL
                DEFEATED BY: UNIT-01 (BERSERK STATE)
            "},
        )
        .dated("2015-06-22"),
        FileNode::file(
            "05_RAMIEL.rep",
            "40MB",
            indoc! {"
                CODENAME: RAMIEL
                TYPE: 5TH ANGEL
                DEFEATED BY: POSITRON SNIPER RIFLE (OP. YASHIMA)
            "},
        )
        .dated("2015-07-20"),
        FileNode::file(
            "11_IREUL.rep",
            "100MB",
            indoc! {"
                CODENAME: IREUL
                TYPE: 11TH ANGEL
                TARGET: MAGI SYSTEM
                DEFEATED BY: SELF-DESTRUCT CODE INJECTION (CASPER NODE)
            "},
        )
        .dated("2015-11-10"),
    ]
}

fn project_files() -> Vec<FileNode> {
    vec![
        FileNode::file(
            "EVA_GENERAL_SPECS.doc",
            "20MB",
            indoc! {"
                MULTIPURPOSE HUMANOID DECISIVE WEAPON: EVANGELION
                POWER SOURCE: UMBILICAL CABLE, INTERNAL BATTERY (5 MIN)
            "},
        )
        .dated("2004-01-01"),
        FileNode::dir(
            "MASS_PROD_SERIES",
            vec![
                FileNode::file("UNIT_05.stat", "2KB", "STATUS: ACTIVE\nLOCATION: ORBITAL STANDBY")
                    .dated("2016-01-01"),
            ],
        )
        .dated("2016-01-01")
        .classified("SEELE EYES ONLY"),
    ]
}

fn magi_files() -> Vec<FileNode> {
    vec![
        FileNode::file(
            "OS_KERNEL.patch",
            "1.2GB",
            "Patch 777: Security vulnerability in Melchior module fixed.",
        )
        .dated("2015-10-04"),
        FileNode::file(
            "SELF_DESTRUCT.code",
            "1KB",
            indoc! {"
                EMERGENCY OVERRIDE CODE:
                [ENCRYPTED]
                REQ: UNANIMOUS VOTE FROM ALL THREE MAGI NODES.
            "},
        )
        .dated("2015-12-31"),
    ]
}

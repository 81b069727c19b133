//! 脚本解析与文件轮选
//!
//! 文件格式：每行一条命令，命令名后跟最多五个空白/逗号分隔的数值
//! 记号。缺失或解析失败的记号就是"未设置"，用 `Option` 表达，不用
//! 魔数哨兵。空行与连命令名都没有的行被跳过。

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// 每条命令最多携带的参数个数
pub const MAX_PARAMS: usize = 5;

/// 脚本目录扫描用的文件扩展名
const SCRIPT_EXTENSION: &str = "as";

/// 脚本层错误类型
#[derive(Error, Debug)]
pub enum ScriptError {
    /// 脚本文件读取失败
    #[error("Failed to read script file: {0}")]
    Io(#[from] std::io::Error),

    /// 脚本目录扫描失败
    #[error("Failed to scan script directory `{path}`: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// 一条自动脚本命令
///
/// 命令名在解析时统一小写；`params[i]` 为 `None` 表示脚本没写这个
/// 参数（或写了个解析不了的记号）。
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub name: String,
    pub params: [Option<f64>; MAX_PARAMS],
}

impl Command {
    pub fn new(name: impl Into<String>, params: [Option<f64>; MAX_PARAMS]) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// 程序走到末尾时的哨兵命令
    pub fn end() -> Self {
        Self::new("end", [None; MAX_PARAMS])
    }

    /// 越界取命令时的哨兵命令
    pub fn invalid() -> Self {
        Self::new("invalid", [None; MAX_PARAMS])
    }

    /// 是否是终止哨兵（end/invalid 都终止执行）
    pub fn is_terminal(&self) -> bool {
        self.name == "end" || self.name == "invalid"
    }

    /// 取第 `index` 个参数
    pub fn param(&self, index: usize) -> Option<f64> {
        self.params.get(index).copied().flatten()
    }
}

/// 解析一行脚本
///
/// 返回 `None` 表示该行没有可用内容（空行或纯分隔符）。
pub fn parse_line(line: &str) -> Option<Command> {
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());

    let name = tokens.next()?.to_lowercase();

    let mut params = [None; MAX_PARAMS];
    for slot in params.iter_mut() {
        match tokens.next() {
            // 记号存在但解析不了 → 该参数视为未设置，继续后面的参数
            Some(token) => *slot = token.parse::<f64>().ok(),
            None => break,
        }
    }

    Some(Command::new(name, params))
}

/// 一份已加载的自动脚本程序
#[derive(Debug, Clone, Default)]
pub struct Program {
    commands: Vec<Command>,
    cursor: usize,
}

impl Program {
    /// 从脚本文本解析
    pub fn parse(text: &str) -> Self {
        let commands: Vec<Command> = text.lines().filter_map(parse_line).collect();
        debug!("Parsed autoscript: {} commands", commands.len());
        Self {
            commands,
            cursor: 0,
        }
    }

    /// 从文件加载
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// 取下一条命令并推进游标；走过末尾返回 `end` 哨兵
    pub fn next(&mut self) -> Command {
        match self.commands.get(self.cursor) {
            Some(command) => {
                self.cursor += 1;
                command.clone()
            },
            None => Command::end(),
        }
    }

    /// 取指定下标的命令；越界返回 `invalid` 哨兵
    pub fn get(&self, index: usize) -> Command {
        self.commands.get(index).cloned().unwrap_or_else(Command::invalid)
    }

    /// 游标回到开头
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// 脚本文件目录与轮选
///
/// 扫描工作目录下固定扩展名的脚本文件并按文件名排序；操作员在
/// 待机模式里用一个按键循环切换选中的脚本。
#[derive(Debug, Clone, Default)]
pub struct ScriptCatalog {
    files: Vec<PathBuf>,
    index: usize,
}

impl ScriptCatalog {
    /// 扫描目录
    pub fn scan(dir: &Path) -> Result<Self, ScriptError> {
        let entries = fs::read_dir(dir).map_err(|source| ScriptError::Scan {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.is_file()
                    && path.extension().and_then(|e| e.to_str()) == Some(SCRIPT_EXTENSION)
                {
                    Some(path)
                } else {
                    None
                }
            })
            .collect();
        files.sort();

        if files.is_empty() {
            warn!("No autoscript files found in {}", dir.display());
        }
        Ok(Self { files, index: 0 })
    }

    /// 当前选中的脚本
    pub fn selected(&self) -> Option<&Path> {
        self.files.get(self.index).map(PathBuf::as_path)
    }

    /// 循环切换到下一个脚本，返回新选中的
    pub fn cycle_next(&mut self) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.files.len();
        self.selected()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_space_and_comma_mix() {
        let cmd = parse_line("DriveTime 2.5, 2 0.8").unwrap();
        assert_eq!(cmd.name, "drivetime");
        assert_eq!(cmd.param(0), Some(2.5));
        assert_eq!(cmd.param(1), Some(2.0));
        assert_eq!(cmd.param(2), Some(0.8));
        assert_eq!(cmd.param(3), None);
        assert_eq!(cmd.param(4), None);
    }

    #[test]
    fn test_parse_line_unparseable_token_is_unset() {
        let cmd = parse_line("shoot abc").unwrap();
        assert_eq!(cmd.name, "shoot");
        assert_eq!(cmd.param(0), None);

        // 坏记号不影响后面的参数槽位
        let cmd = parse_line("turntime 2.0 oops 0.5").unwrap();
        assert_eq!(cmd.param(0), Some(2.0));
        assert_eq!(cmd.param(1), None);
        assert_eq!(cmd.param(2), Some(0.5));
    }

    #[test]
    fn test_parse_line_blank_is_skipped() {
        assert!(parse_line("").is_none());
        assert!(parse_line("   \t  ").is_none());
        assert!(parse_line(" , , ").is_none());
    }

    #[test]
    fn test_parse_line_extra_tokens_ignored() {
        let cmd = parse_line("wait 1 2 3 4 5 6 7").unwrap();
        assert_eq!(cmd.params, [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]);
    }

    #[test]
    fn test_program_cursor_and_end_sentinel() {
        let mut program = Program::parse("wait 1.0\n\nshoot 50\n");
        assert_eq!(program.len(), 2);
        assert_eq!(program.next().name, "wait");
        assert_eq!(program.next().name, "shoot");
        // 走过末尾永远返回 end 哨兵
        assert!(program.next().is_terminal());
        assert!(program.next().is_terminal());

        program.rewind();
        assert_eq!(program.next().name, "wait");
    }

    #[test]
    fn test_program_get_out_of_range_is_invalid() {
        let program = Program::parse("wait 1.0");
        assert_eq!(program.get(0).name, "wait");
        assert_eq!(program.get(7).name, "invalid");
        assert!(program.get(7).is_terminal());
    }

    #[test]
    fn test_catalog_scan_and_cycle() {
        let dir = std::env::temp_dir().join(format!(
            "talos_catalog_test_{}",
            std::process::id()
        ));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.as"), "wait 1.0\n").unwrap();
        fs::write(dir.join("a.as"), "wait 2.0\n").unwrap();
        fs::write(dir.join("notes.txt"), "not a script\n").unwrap();

        let mut catalog = ScriptCatalog::scan(&dir).unwrap();
        assert_eq!(catalog.len(), 2);
        // 按文件名排序，初始选中第一个
        assert!(catalog.selected().unwrap().ends_with("a.as"));
        assert!(catalog.cycle_next().unwrap().ends_with("b.as"));
        // 回绕
        assert!(catalog.cycle_next().unwrap().ends_with("a.as"));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_catalog_missing_dir_is_error() {
        let result = ScriptCatalog::scan(Path::new("/nonexistent/talos/scripts"));
        assert!(matches!(result, Err(ScriptError::Scan { .. })));
    }

    #[test]
    fn test_catalog_empty_cycle_is_none() {
        let mut catalog = ScriptCatalog::default();
        assert!(catalog.selected().is_none());
        assert!(catalog.cycle_next().is_none());
    }
}

mod init_mutex;

pub(crate) use init_mutex::InitMutex;
